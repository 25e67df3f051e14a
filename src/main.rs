#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    arcana::server::run().await
}
