use crate::{ConfigError, FromEnv, env_parse};
use std::env;
use std::time::Duration;

/// Database configuration.
///
/// Without `DATABASE_URL` the service keeps its data in memory.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn new(url: String) -> Self {
        Self {
            url: Some(url),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_secs: 8,
            run_migrations: true,
        }
    }
}

impl FromEnv for DatabaseConfig {
    /// Reads from environment variables:
    /// - DATABASE_URL: optional, blank counts as unset
    /// - DB_MAX_CONNECTIONS: defaults to 10
    /// - DB_CONNECT_TIMEOUT_SECS: defaults to 8
    /// - DB_RUN_MIGRATIONS: defaults to true
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = env::var("DATABASE_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let max_connections = env_parse("DB_MAX_CONNECTIONS", defaults.max_connections)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            url,
            max_connections,
            connect_timeout_secs: env_parse(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            run_migrations: env_parse("DB_RUN_MIGRATIONS", defaults.run_migrations)?,
        })
    }
}
