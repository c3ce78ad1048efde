use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Background tasks of a running node plus the channel that stops them.
pub struct ServiceHandle {
    shutdown_tx: watch::Sender<bool>,
    join_handles: Vec<JoinHandle<Result<()>>>,
}

impl ServiceHandle {
    /// Create a handle and the receiver tasks watch for shutdown.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { shutdown_tx: tx, join_handles: vec![] }, rx)
    }

    pub fn attach(&mut self, h: JoinHandle<Result<()>>) {
        self.join_handles.push(h);
    }

    pub fn task_count(&self) -> usize {
        self.join_handles.len()
    }

    /// Signal shutdown, then wait for every task in attach order.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        let mut first_err = None;
        for h in self.join_handles {
            match h.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!("service task returned error: {:?}", e);
                    first_err.get_or_insert(e);
                }
                Err(e) => tracing::error!("task join error: {:?}", e),
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
