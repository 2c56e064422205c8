//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `127.0.0.1` |
//! | `PORT` | `8080` |
//! | `DATA_PATH` | `data/requests.csv` |
//! | `DASHBOARD_UTC_OFFSET` | `UTC` |
//! | `DASHBOARD_THEME` | unset (embedded theme) |
//! | `STATIC_DIR` | `app` |

use std::path::PathBuf;

use rescue_dashboard_query::clock::{ClockError, DashboardClock};
use thiserror::Error;

/// Default location of the rescue request table.
pub const DEFAULT_DATA_PATH: &str = "data/requests.csv";

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The calendar offset is invalid.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// `PORT` is not a valid port number.
    #[error("invalid PORT '{value}'")]
    InvalidPort {
        /// The rejected value.
        value: String,
    },

    /// The theme override file could not be read.
    #[error("failed to read theme file {}: {source}", path.display())]
    ThemeRead {
        /// Path of the override file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The theme TOML is malformed or has unknown keys.
    #[error("invalid theme: {0}")]
    ThemeParse(#[from] toml::de::Error),
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// File path or URL of the rescue request CSV.
    pub data_source: String,
    /// Calendar convention for the time-window filter.
    pub clock: DashboardClock,
    /// Optional theme override file.
    pub theme_path: Option<PathBuf>,
    /// Directory holding `index.html` and other static assets.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            data_source: DEFAULT_DATA_PATH.to_string(),
            clock: DashboardClock::utc(),
            theme_path: None,
            static_dir: PathBuf::from("app"),
        }
    }
}

impl ServerConfig {
    /// Reads configuration from environment variables, falling back to the
    /// defaults for any that are unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` or `DASHBOARD_UTC_OFFSET` is set to
    /// an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the value of an
    /// environment variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` or `DASHBOARD_UTC_OFFSET` is set to
    /// an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => defaults.port,
        };

        let clock = match lookup("DASHBOARD_UTC_OFFSET") {
            Some(value) => DashboardClock::from_offset_str(&value)?,
            None => defaults.clock,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            data_source: lookup("DATA_PATH").unwrap_or(defaults.data_source),
            clock,
            theme_path: lookup("DASHBOARD_THEME").map(PathBuf::from),
            static_dir: lookup("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_source, DEFAULT_DATA_PATH);
        assert_eq!(config.clock, DashboardClock::utc());
        assert!(config.theme_path.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "9000"),
            ("DATA_PATH", "https://example.org/requests.csv"),
            ("DASHBOARD_UTC_OFFSET", "+05:30"),
            ("DASHBOARD_THEME", "theme.toml"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_source, "https://example.org/requests.csv");
        assert_eq!(config.clock.offset().local_minus_utc(), 19_800);
        assert_eq!(config.theme_path, Some(PathBuf::from("theme.toml")));
    }

    #[test]
    fn rejects_bad_port_and_offset() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("DASHBOARD_UTC_OFFSET", "IST")])),
            Err(ConfigError::Clock(_))
        ));
    }
}
