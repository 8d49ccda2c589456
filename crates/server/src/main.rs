//! qrbot server binary.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    server::init_tracing(&config.log_level)?;

    server::start_server(config).await?;

    Ok(())
}
