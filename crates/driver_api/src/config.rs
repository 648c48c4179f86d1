//! Runtime configuration from environment variables.
//!
//! | Variable                    | Default                  |
//! |-----------------------------|--------------------------|
//! | `DRIVERS_CONNECTION_STRING` | `Data Source=drivers.db` |
//! | `DRIVERS_BIND_ADDR`         | `127.0.0.1:5000`         |
//! | `DRIVERS_LOG_LEVEL`         | build-mode default       |
//! | `DRIVERS_LOG_DIR`           | `<cwd>/logs`             |
//!
//! Blank values count as unset.

use driver_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

pub const CONNECTION_STRING_VAR: &str = "DRIVERS_CONNECTION_STRING";
pub const BIND_ADDR_VAR: &str = "DRIVERS_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "DRIVERS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "DRIVERS_LOG_DIR";

pub const DEFAULT_CONNECTION_STRING: &str = "Data Source=drivers.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    InvalidBindAddr {
        value: String,
        source: AddrParseError,
    },
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr { value, source } => {
                write!(f, "invalid {BIND_ADDR_VAR} `{value}`: {source}")
            }
            Self::CurrentDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBindAddr { source, .. } => Some(source),
            Self::CurrentDir(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub connection_string: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let bind_raw = value(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_raw.clone(),
                source,
            })?;

        let log_dir = match value(LOG_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()
                .map_err(ConfigError::CurrentDir)?
                .join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            connection_string: value(CONNECTION_STRING_VAR)
                .unwrap_or_else(|| DEFAULT_CONNECTION_STRING.to_string()),
            bind_addr,
            log_level: value(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig, DEFAULT_CONNECTION_STRING};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = ServerConfig::from_lookup(lookup(&[("DRIVERS_LOG_LEVEL", "  ")])).unwrap();
        assert_eq!(config.connection_string, DEFAULT_CONNECTION_STRING);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_level, driver_core::default_log_level());
        assert!(config.log_dir.is_absolute());
        assert!(config.log_dir.ends_with("logs"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DRIVERS_CONNECTION_STRING", "Data Source=/var/lib/drivers.db"),
            ("DRIVERS_BIND_ADDR", "0.0.0.0:8080"),
            ("DRIVERS_LOG_LEVEL", "warn"),
            ("DRIVERS_LOG_DIR", "/var/log/drivers"),
        ]))
        .unwrap();
        assert_eq!(config.connection_string, "Data Source=/var/lib/drivers.db");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/drivers"));
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("DRIVERS_BIND_ADDR", "localhost")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { ref value, .. } if value == "localhost"));
    }
}
