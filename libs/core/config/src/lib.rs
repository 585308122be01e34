//! Environment-driven configuration shared by the event hub crates.

pub mod database;
pub mod scheduler;
pub mod server;
pub mod tracing;

use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },

    #[error("Invalid value for '{key}': {details}")]
    InvalidValue { key: String, details: String },
}

/// Name and version reported by the service, usually built with [`app_info!`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Builds an [`AppInfo`] from the calling crate's Cargo metadata.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

/// Deployment flavor, read from `APP_ENV`. Only "production" (any case)
/// selects [`Environment::Production`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV") {
            Ok(value) if value.trim().eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Configuration sections loadable from process environment variables.
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses `key` into `T`, falling back to `default` when the variable is unset
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_env_selects_environment() {
        let cases = [
            (None, Environment::Development),
            (Some("production"), Environment::Production),
            (Some(" Production "), Environment::Production),
            (Some("staging"), Environment::Development),
        ];

        for (value, expected) in cases {
            temp_env::with_var("APP_ENV", value, || {
                let env = Environment::from_env();
                assert_eq!(env, expected, "APP_ENV={value:?}");
                assert_eq!(env.is_production(), !env.is_development());
            });
        }
    }

    #[test]
    fn test_env_or_default() {
        temp_env::with_var("EVENTHUB_TEST_LOCATION", Some("Hall B"), || {
            assert_eq!(env_or_default("EVENTHUB_TEST_LOCATION", "Hall A"), "Hall B");
        });
        temp_env::with_var_unset("EVENTHUB_TEST_LOCATION", || {
            assert_eq!(env_or_default("EVENTHUB_TEST_LOCATION", "Hall A"), "Hall A");
        });
    }

    #[test]
    fn test_env_parse_uses_default_when_unset() {
        temp_env::with_var_unset("PARSE_VAR", || {
            assert_eq!(env_parse("PARSE_VAR", 42u32).unwrap(), 42);
        });
    }

    #[test]
    fn test_env_parse_reads_and_rejects() {
        temp_env::with_var("PARSE_VAR", Some(" 17 "), || {
            assert_eq!(env_parse("PARSE_VAR", 0u64).unwrap(), 17);
        });

        temp_env::with_var("PARSE_VAR", Some("yes please"), || {
            let err = env_parse("PARSE_VAR", false).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "PARSE_VAR"));
        });
    }

    #[test]
    fn test_app_info_macro_uses_crate_metadata() {
        let info = app_info!();
        assert_eq!(info.name, "core_config");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
