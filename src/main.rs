#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tokenfarm::node::run_cli().await
}
