//! API Server binary entrypoint.

use api_server::{ApiServer, ServerConfig};
use relay_core::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api_server=debug,trading_engine=debug,relay_core=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let relay_config = Config::from_env()?;
    if !relay_config.exchange.has_credentials() {
        tracing::warn!("Binance testnet credentials are not set; webhook orders will fail");
    }

    let server = ApiServer::new(ServerConfig::from_env(), relay_config)?;
    server.run().await?;

    Ok(())
}
