use crate::{ConfigError, FromEnv, env_parse};
use std::time::Duration;

/// Background status reconciliation settings
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

impl FromEnv for SchedulerConfig {
    /// Reads from environment variables:
    /// - RECONCILE_ENABLED: defaults to true
    /// - RECONCILE_INTERVAL_SECS: defaults to 60, must be at least 1
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let interval_secs = env_parse("RECONCILE_INTERVAL_SECS", defaults.interval_secs)?;

        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RECONCILE_INTERVAL_SECS".to_string(),
                details: "must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            enabled: env_parse("RECONCILE_ENABLED", defaults.enabled)?,
            interval_secs,
        })
    }
}
