//! Main entry point for the fedadmin portal server.

#![forbid(unsafe_code)]
#![deny(warnings)]

use fedadmin_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        provider = %config.provider,
        development_mode = config.development_mode,
        "fedadmin starting"
    );

    Server::new(config).run().await
}
