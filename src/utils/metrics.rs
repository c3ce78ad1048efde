use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const TX_SUCCESS: &str = "tx_success";
pub const TX_REVERTED: &str = "tx_reverted";
pub const CONTRACTS_DEPLOYED: &str = "contracts_deployed";
pub const BLOCK_HEIGHT: &str = "block_height";

/// Process-wide counters and gauges for the devnet.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    counters: Arc<Mutex<BTreeMap<String, u64>>>,
    gauges: Arc<Mutex<BTreeMap<String, f64>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_counter(&self, name: &str) {
        *self.counters.lock().entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.lock().get(name).copied().unwrap_or(0)
    }

    pub fn set_gauge(&self, name: &str, val: f64) {
        self.gauges.lock().insert(name.to_string(), val);
    }

    pub fn snapshot(&self) -> (BTreeMap<String, u64>, BTreeMap<String, f64>) {
        (self.counters.lock().clone(), self.gauges.lock().clone())
    }
}

lazy_static! {
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let m = MetricsRegistry::new();
        m.inc_counter("x");
        m.inc_counter("x");
        m.set_gauge("g", 3.0);
        assert_eq!(m.counter("x"), 2);
        assert_eq!(m.counter("missing"), 0);
        let (c, g) = m.snapshot();
        assert_eq!(c["x"], 2);
        assert_eq!(g["g"], 3.0);
    }
}
