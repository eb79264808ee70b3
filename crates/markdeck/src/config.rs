//! Application configuration loaded from environment variables.

use std::fmt;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Default size of the Postgres connection pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

/// Database configuration.
#[derive(Clone)]
pub struct Config {
    /// Postgres host name or address.
    pub db_host: String,

    /// Postgres port.
    pub db_port: u16,

    /// Postgres user.
    pub db_user: String,

    /// Postgres password. Never logged.
    pub db_password: String,

    /// Database name.
    pub db_name: String,

    /// Upper bound on pooled connections.
    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`
    ///
    /// Optional:
    /// - `DB_MAX_CONNECTIONS`: pool size (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_host = required("DB_HOST")?;
        let db_port = required("DB_PORT")?
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                name: "DB_PORT",
                reason: e.to_string(),
            })?;
        let db_user = required("DB_USER")?;
        let db_password = required("DB_PASSWORD")?;
        let db_name = required("DB_NAME")?;

        let db_max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) if !raw.trim().is_empty() => parse_pool_size(&raw)?,
            _ => DEFAULT_MAX_CONNECTIONS,
        };

        tracing::info!(
            db_host = %db_host,
            db_port,
            db_user = %db_user,
            db_name = %db_name,
            db_max_connections,
            "configuration loaded"
        );

        Ok(Self {
            db_host,
            db_port,
            db_user,
            db_password,
            db_name,
            db_max_connections,
        })
    }

    /// Connection options for the Postgres pool.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .ssl_mode(PgSslMode::Disable)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "DB_MAX_CONNECTIONS",
        reason,
    };
    let size = raw.trim().parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }
    Ok(size)
}
