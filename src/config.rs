//! Run configuration loaded from TOML.
//!
//! ```toml
//! workers = 0            # 0 means one worker per core
//! data_dir = "soundings"
//!
//! [retry]
//! max_attempts = 3
//! initial_backoff_ms = 500
//! max_backoff_ms = 8000
//! station_budget_secs = 60
//!
//! [[stations]]
//! code = "WIII"
//! name = "Jakarta"
//! latitude = -6.12
//! longitude = 106.65
//! ```
//!
//! When no stations are listed the Indonesian network is used.
use crate::{
    error::ConfigError,
    source::RetryPolicy,
    station::{Station, StationTable},
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Settings for retrying a busy profile source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrySettings {
    /// Total number of attempts per station, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Upper bound on the delay between retries.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Time budget for one station, after which it is reported unavailable.
    #[serde(default = "default_station_budget_secs")]
    pub station_budget_secs: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    8_000
}

fn default_station_budget_secs() -> u64 {
    60
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            station_budget_secs: default_station_budget_secs(),
        }
    }
}

impl RetrySettings {
    /// Convert to the policy used by `RetryingSource`.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            budget: Duration::from_secs(self.station_budget_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    workers: usize,
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    retry: RetrySettings,
    #[serde(default)]
    stations: Vec<Station>,
}

/// Validated configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads, 0 for one per core.
    pub workers: usize,
    /// Root directory for the file backed profile source.
    pub data_dir: Option<PathBuf>,
    /// Retry behaviour for the profile source.
    pub retry: RetrySettings,
    /// The stations to process.
    pub stations: StationTable,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workers: 0,
            data_dir: None,
            retry: RetrySettings::default(),
            stations: StationTable::indonesia(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        if raw.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting(
                "retry.max_attempts must be at least 1".to_owned(),
            ));
        }

        let stations = if raw.stations.is_empty() {
            StationTable::indonesia()
        } else {
            StationTable::new(raw.stations)?
        };

        Ok(Config {
            workers: raw.workers,
            data_dir: raw.data_dir,
            retry: raw.retry,
            stations,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.workers, 0);
        assert!(config.data_dir.is_none());
        assert_eq!(config.retry, RetrySettings::default());
        assert_eq!(config.stations.len(), 29);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            workers = 4
            data_dir = "/data/soundings"

            [retry]
            max_attempts = 5
            initial_backoff_ms = 10

            [[stations]]
            code = "WIII"
            name = "Jakarta"
            latitude = -6.12
            longitude = 106.65

            [[stations]]
            code = "WAJW"
            name = "Wamena"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.data_dir, Some(PathBuf::from("/data/soundings")));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_backoff_ms, 10);
        assert_eq!(config.retry.max_backoff_ms, 8_000);
        assert_eq!(config.stations.len(), 2);
        assert_eq!(
            config.stations.get("WIII").unwrap().location(),
            Some((-6.12, 106.65))
        );
        assert!(config.stations.get("WAJW").unwrap().location().is_none());

        let policy = config.retry.policy();
        assert_eq!(policy.initial_backoff, Duration::from_millis(10));
    }

    #[test]
    fn test_corrupt_station_table() {
        let toml = r#"
            [[stations]]
            code = "WIII"
            name = "Jakarta"

            [[stations]]
            code = "WIII"
            name = "Jakarta again"
        "#;
        assert!(matches!(
            Config::from_toml(toml),
            Err(ConfigError::InvalidStation(_))
        ));

        let toml = r#"
            [[stations]]
            name = "No code"
        "#;
        assert!(matches!(Config::from_toml(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let toml = "[retry]\nmax_attempts = 0\n";
        assert!(matches!(
            Config::from_toml(toml),
            Err(ConfigError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/no/such/dir/stations.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
