//! Application configuration.
//!
//! Built from defaults, optionally overridden by `GREEN_PLATE_*` environment
//! variables, then adjusted with the `with_*` builder methods.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::api::DEFAULT_API_BASE_URL;
use crate::error::ConfigError;
use crate::query::{CacheDuration, QueryClientConfig};

pub const ENV_API_URL: &str = "GREEN_PLATE_API_URL";
pub const ENV_DATA_DIR: &str = "GREEN_PLATE_DATA_DIR";
pub const ENV_STALE_TIME: &str = "GREEN_PLATE_STALE_TIME";
pub const ENV_GC_TIME: &str = "GREEN_PLATE_GC_TIME";
pub const ENV_RETRY: &str = "GREEN_PLATE_RETRY";
pub const ENV_GC_SWEEP_SECS: &str = "GREEN_PLATE_GC_SWEEP_SECS";

const APP_DIR_NAME: &str = "green-plate";

/// Configuration for an [`AppContext`](crate::context::AppContext).
///
/// # Example
///
/// ```ignore
/// use green_plate::config::AppConfig;
/// use green_plate::query::CacheDuration;
///
/// let config = AppConfig::from_env()
///     .with_api_base_url("https://api.greenplate.example")
///     .with_stale_time(CacheDuration::FiveMinutes);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Where the session record lives; the platform data dir when unset
    pub data_dir: Option<PathBuf>,
    pub query: QueryClientConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: None,
            query: QueryClientConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Client-wide default staleness for every query.
    pub fn with_stale_time(mut self, stale_time: impl Into<Duration>) -> Self {
        self.query.default_options.stale_time = Some(stale_time.into());
        self
    }

    /// Client-wide default gc duration for every query.
    pub fn with_gc_time(mut self, gc_time: impl Into<Duration>) -> Self {
        self.query.default_options.gc_time = Some(gc_time.into());
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.query.default_options.retry = Some(retry);
        self
    }

    pub fn with_gc_sweep_interval(mut self, interval: Duration) -> Self {
        self.query.gc_sweep_interval = Some(interval);
        self
    }

    /// Defaults overridden by the `GREEN_PLATE_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(value) = get(ENV_STALE_TIME) {
            if let Some(stale_time) = ignore_invalid(parse_duration(ENV_STALE_TIME, &value)) {
                config = config.with_stale_time(stale_time);
            }
        }
        if let Some(value) = get(ENV_GC_TIME) {
            if let Some(gc_time) = ignore_invalid(parse_duration(ENV_GC_TIME, &value)) {
                config = config.with_gc_time(gc_time);
            }
        }
        if let Some(value) = get(ENV_RETRY) {
            let retry = value.trim().parse::<u32>().map_err(|e| invalid(ENV_RETRY, &value, e));
            if let Some(retry) = ignore_invalid(retry) {
                config = config.with_retry(retry);
            }
        }
        if let Some(value) = get(ENV_GC_SWEEP_SECS) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid(ENV_GC_SWEEP_SECS, &value, e))
                .and_then(|secs| {
                    if secs == 0 {
                        Err(invalid(ENV_GC_SWEEP_SECS, &value, "must be positive"))
                    } else {
                        Ok(secs)
                    }
                });
            if let Some(secs) = ignore_invalid(secs) {
                config = config.with_gc_sweep_interval(Duration::from_secs(secs));
            }
        }

        config
    }

    /// The directory holding durable state.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(ConfigError::NoDataDirectory),
        }
    }
}

/// Accepts a named duration (`five-minutes`) or a number of seconds.
fn parse_duration(variable: &str, value: &str) -> Result<Duration, ConfigError> {
    let trimmed = value.trim();
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    trimmed
        .parse::<CacheDuration>()
        .map(Duration::from)
        .map_err(|reason| invalid(variable, value, reason))
}

fn invalid(variable: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        variable: variable.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn ignore_invalid<T>(result: Result<T, ConfigError>) -> Option<T> {
    result
        .map_err(|err| warn!(error = %err, "Ignoring configuration value"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_leave_query_options_unset() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.data_dir.is_none());
        assert_eq!(config.query, QueryClientConfig::default());
    }

    #[test]
    fn test_named_and_numeric_durations() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_STALE_TIME, "five-minutes"),
            (ENV_GC_TIME, "90"),
            (ENV_RETRY, "2"),
            (ENV_GC_SWEEP_SECS, "15"),
        ]));
        let options = config.query.default_options;
        assert_eq!(options.stale_time, Some(Duration::from_secs(300)));
        assert_eq!(options.gc_time, Some(Duration::from_secs(90)));
        assert_eq!(options.retry, Some(2));
        assert_eq!(config.query.gc_sweep_interval, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_STALE_TIME, "fortnight"),
            (ENV_RETRY, "-1"),
            (ENV_GC_SWEEP_SECS, "0"),
            (ENV_API_URL, "   "),
        ]));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = AppConfig::new().with_data_dir("/tmp/gp");
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/tmp/gp"));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var(ENV_API_URL, "https://api.greenplate.test");
        std::env::set_var(ENV_DATA_DIR, "/var/lib/green-plate");
        let config = AppConfig::from_env();
        std::env::remove_var(ENV_API_URL);
        std::env::remove_var(ENV_DATA_DIR);

        assert_eq!(config.api_base_url, "https://api.greenplate.test");
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/green-plate")));
    }
}
