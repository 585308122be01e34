use core_config::{
    AppInfo, FromEnv, app_info, database::DatabaseConfig, scheduler::SchedulerConfig,
    server::ServerConfig,
};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub scheduler: SchedulerConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let database = DatabaseConfig::from_env()?; // No DATABASE_URL means in-memory storage
        let scheduler = SchedulerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            scheduler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars_unset(
            [
                "APP_ENV",
                "HOST",
                "PORT",
                "DATABASE_URL",
                "RECONCILE_ENABLED",
                "RECONCILE_INTERVAL_SECS",
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "eventhub_api");
                assert!(config.environment.is_development());
                assert_eq!(config.server.port, 8080);
                assert!(config.database.url.is_none());
                assert!(config.scheduler.enabled);
                assert_eq!(config.scheduler.interval_secs, 60);
            },
        );
    }

    #[test]
    fn test_config_surfaces_invalid_interval() {
        temp_env::with_var("RECONCILE_INTERVAL_SECS", Some("0"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("RECONCILE_INTERVAL_SECS"));
        });
    }
}
