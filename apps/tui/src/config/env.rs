use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenv::dotenv;
use thiserror::Error;
use url::Url;

use super::analytics::AnalyticsEmbed;
use crate::api::{ApiClient, ApiError, DataSource};
use crate::fetch::FetchConfig;

pub const API_URL_VAR: &str = "CONFLICT_API_URL";
pub const DEBOUNCE_VAR: &str = "CONFLICT_DEBOUNCE_MS";
pub const READ_TIMEOUT_VAR: &str = "CONFLICT_READ_TIMEOUT_SECS";
pub const LOG_FILE_VAR: &str = "CONFLICT_LOG_FILE";
pub const DEBUG_VAR: &str = "DEBUG";

pub const DEFAULT_LOG_FILE: &str = "conflict-explorer.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

/// Where the dashboard reads its data from, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceConfig {
    Remote { base_url: Url },
    Demo { reason: String },
}

impl DataSourceConfig {
    fn from_value(value: Option<String>) -> Self {
        let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
            return Self::Demo {
                reason: format!("{API_URL_VAR} is not set"),
            };
        };
        match Url::parse(raw.trim()) {
            Ok(base_url) if matches!(base_url.scheme(), "http" | "https") => {
                Self::Remote { base_url }
            }
            Ok(base_url) => Self::Demo {
                reason: format!("{API_URL_VAR} has unsupported scheme {}", base_url.scheme()),
            },
            Err(e) => Self::Demo {
                reason: format!("{API_URL_VAR} is not a valid URL ({e})"),
            },
        }
    }

    /// Builds the data source; a client that cannot be created is a configuration problem.
    pub fn connect(&self, read_timeout: Duration) -> Result<DataSource, ApiError> {
        match self {
            Self::Remote { base_url } => {
                ApiClient::new(base_url.clone(), read_timeout).map(DataSource::Remote)
            }
            Self::Demo { reason } => Ok(DataSource::Demo {
                reason: reason.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_source: DataSourceConfig,
    pub fetch: FetchConfig,
    pub analytics: AnalyticsEmbed,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = FetchConfig::default();
        let debounce = read_number(&lookup, DEBOUNCE_VAR)?
            .map_or(defaults.debounce, Duration::from_millis);
        let read_timeout = match read_number(&lookup, READ_TIMEOUT_VAR)? {
            Some(0) => return Err(ConfigError::Zero { var: READ_TIMEOUT_VAR }),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.read_timeout,
        };

        Ok(Self {
            data_source: DataSourceConfig::from_value(lookup(API_URL_VAR)),
            fetch: FetchConfig {
                debounce,
                read_timeout,
            },
            analytics: AnalyticsEmbed::from_lookup(&lookup),
            log_file: lookup(LOG_FILE_VAR)
                .filter(|path| !path.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            debug: lookup(DEBUG_VAR).is_some_and(|value| is_truthy(&value)),
        })
    }

    /// Switches to demo data regardless of the configured endpoint.
    pub fn force_demo(&mut self, reason: impl Into<String>) {
        self.data_source = DataSourceConfig::Demo {
            reason: reason.into(),
        };
    }
}

fn read_number<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber { var, value })
        })
        .transpose()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_api_url_selects_demo_data() {
        let config = load(&[]).unwrap();

        assert_eq!(
            config.data_source,
            DataSourceConfig::Demo {
                reason: "CONFLICT_API_URL is not set".into()
            }
        );
        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(!config.debug);
    }

    #[test]
    fn invalid_api_url_degrades_to_demo_data() {
        let config = load(&[(API_URL_VAR, "not a url")]).unwrap();
        assert!(matches!(config.data_source, DataSourceConfig::Demo { .. }));

        let config = load(&[(API_URL_VAR, "ftp://example.org")]).unwrap();
        assert!(matches!(config.data_source, DataSourceConfig::Demo { .. }));
    }

    #[test]
    fn reads_remote_settings() {
        let config = load(&[
            (API_URL_VAR, "http://localhost:3001"),
            (DEBOUNCE_VAR, "150"),
            (READ_TIMEOUT_VAR, "4"),
            (DEBUG_VAR, "true"),
        ])
        .unwrap();

        assert!(matches!(config.data_source, DataSourceConfig::Remote { .. }));
        assert_eq!(config.fetch.debounce, Duration::from_millis(150));
        assert_eq!(config.fetch.read_timeout, Duration::from_secs(4));
        assert!(config.debug);
        assert!(!config.data_source.connect(config.fetch.read_timeout).unwrap().is_demo());
    }

    #[test]
    fn rejects_unparseable_numbers() {
        assert_eq!(
            load(&[(DEBOUNCE_VAR, "fast")]).unwrap_err(),
            ConfigError::InvalidNumber {
                var: DEBOUNCE_VAR,
                value: "fast".into()
            }
        );
        assert_eq!(
            load(&[(READ_TIMEOUT_VAR, "0")]).unwrap_err(),
            ConfigError::Zero {
                var: READ_TIMEOUT_VAR
            }
        );
    }

    #[test]
    fn force_demo_overrides_remote() {
        let mut config = load(&[(API_URL_VAR, "http://localhost:3001")]).unwrap();
        config.force_demo("--demo flag");
        assert!(config.data_source.connect(Duration::from_secs(1)).unwrap().is_demo());
    }
}
