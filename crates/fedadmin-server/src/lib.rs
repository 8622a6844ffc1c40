//! # fedadmin-server
//!
//! HTTP server for the fedadmin identity portal.
//!
//! Wires the provisioning workflow, the admin surface, and a health
//! endpoint over either the in-memory store (default) or PostgreSQL
//! (when `DATABASE_URL` is set).
//!
//! ## Usage
//!
//! ```ignore
//! use fedadmin_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env();
//! Server::new(config).run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod auth;
pub mod config;
pub mod health;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use fedadmin_session::MemorySessions;
use fedadmin_store::MemoryStore;
use fedadmin_store_sql::{create_pool, PgRoleStore, PgUserStore, PoolConfig, MIGRATOR};

/// The fedadmin portal server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Creates a new server instance.
    #[must_use]
    pub const fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Runs the server until a shutdown signal arrives.
    ///
    /// ## Errors
    ///
    /// Returns an error when the database or the listener cannot be set
    /// up, or when serving fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let app = match self.config.database_url.clone() {
            Some(url) => {
                let pool_config = PoolConfig::new(url)
                    .max_connections(self.config.db_max_connections)
                    .min_connections(self.config.db_min_connections);
                let pool = create_pool(&pool_config).await?;
                MIGRATOR.run(&pool).await?;
                tracing::info!("database connection pool created");

                let state = AppState::new(
                    self.config.clone(),
                    Arc::new(PgUserStore::new(pool.clone())),
                    Arc::new(PgRoleStore::new(pool)),
                    Arc::new(MemorySessions::new()),
                );
                create_router(state)
            }
            None => {
                tracing::info!("no DATABASE_URL set, using the in-memory store");
                let store = Arc::new(MemoryStore::new());
                let state = AppState::new(
                    self.config.clone(),
                    Arc::clone(&store),
                    store,
                    Arc::new(MemorySessions::new()),
                );
                create_router(state)
            }
        };

        serve(app, &self.config).await
    }
}

async fn serve(app: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
