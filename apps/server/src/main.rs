#[tokio::main]
async fn main() -> anyhow::Result<()> {
    poke_memory_server::run().await
}
