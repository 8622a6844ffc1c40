//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults; only the database URL is optional (without one the server
//! runs on the in-memory store).

use fedadmin_provision::ProvisioningPolicy;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Database connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,

    /// Minimum database connections.
    pub db_min_connections: u32,

    /// Maximum database connections.
    pub db_max_connections: u32,

    /// Identity provider scheme new logins are linked under.
    pub provider: String,

    /// Development mode: newly provisioned accounts are enabled
    /// immediately. Never enable outside local development.
    pub development_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            db_min_connections: 1,
            db_max_connections: 10,
            provider: "saml2".to_string(),
            development_mode: false,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env if present; ignored when absent.
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        Self {
            host: std::env::var("FEDADMIN_HOST").unwrap_or(defaults.host),
            port: std::env::var("FEDADMIN_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: std::env::var("DATABASE_URL").ok(),
            db_min_connections: std::env::var("FEDADMIN_DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_min_connections),
            db_max_connections: std::env::var("FEDADMIN_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_max_connections),
            provider: std::env::var("FEDADMIN_PROVIDER").unwrap_or(defaults.provider),
            development_mode: std::env::var("FEDADMIN_DEV_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.development_mode),
        }
    }

    /// Configuration for tests: in-memory store, development mode on.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            development_mode: true,
            ..Self::default()
        }
    }

    /// The provisioning policy this configuration implies.
    #[must_use]
    pub fn provisioning_policy(&self) -> ProvisioningPolicy {
        if self.development_mode {
            ProvisioningPolicy::development()
        } else {
            ProvisioningPolicy::production()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_production_like() {
        let config = ServerConfig::default();

        assert!(!config.development_mode);
        assert!(config.database_url.is_none());
        assert!(!config.provisioning_policy().auto_enable_new_users);
    }

    #[test]
    fn testing_config_enables_development_mode() {
        let config = ServerConfig::for_testing();

        assert!(config.development_mode);
        assert!(config.provisioning_policy().auto_enable_new_users);
    }
}
