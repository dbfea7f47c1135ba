#[tokio::main]
async fn main() -> anyhow::Result<()> {
    excmd_lib::run().await
}
