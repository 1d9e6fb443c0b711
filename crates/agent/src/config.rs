use std::time::Duration;

use soilwatch_core::alert::AlertThreshold;
use soilwatch_core::sensor_names::{SENSOR_MOISTURE, SENSOR_NAMESPACE};

use crate::fetcher::DEFAULT_FETCH_TIMEOUT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Agent configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Realtime database root URL.
    pub database_url: String,
    /// Database secret or ID token, if the rules require one.
    pub database_auth: Option<String>,
    pub sensor_namespace: String,
    pub sensor_key: String,
    pub threshold: AlertThreshold,
    /// Upper bound on a single read.
    pub fetch_timeout: Duration,
    /// Read automatically on this interval in addition to manual triggers.
    pub poll_interval: Option<Duration>,
    /// Post alerts here; alerts go to the log when unset.
    pub webhook_url: Option<String>,
    /// The user's opt-in for alerts.
    pub notifications_enabled: bool,
}

impl AgentConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Required | Default    |
    /// |-------------------------|----------|------------|
    /// | `DATABASE_URL`          | yes      | --         |
    /// | `DATABASE_AUTH`         | no       | --         |
    /// | `SENSOR_NAMESPACE`      | no       | `sensor`   |
    /// | `SENSOR_KEY`            | no       | `moisture` |
    /// | `MOISTURE_THRESHOLD`    | no       | `45`       |
    /// | `FETCH_TIMEOUT_SECS`    | no       | `5`        |
    /// | `POLL_INTERVAL_SECS`    | no       | --         |
    /// | `ALERT_WEBHOOK_URL`     | no       | --         |
    /// | `NOTIFICATIONS_ENABLED` | no       | `true`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let threshold = match get("MOISTURE_THRESHOLD") {
            Some(raw) => {
                let value: f64 = parse("MOISTURE_THRESHOLD", &raw)?;
                AlertThreshold::new(value).map_err(|e| invalid("MOISTURE_THRESHOLD", &raw, e))?
            }
            None => AlertThreshold::default(),
        };

        let fetch_timeout = match get("FETCH_TIMEOUT_SECS") {
            Some(raw) => positive_secs("FETCH_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_FETCH_TIMEOUT,
        };

        let poll_interval = get("POLL_INTERVAL_SECS")
            .map(|raw| positive_secs("POLL_INTERVAL_SECS", &raw))
            .transpose()?;

        let notifications_enabled = match get("NOTIFICATIONS_ENABLED") {
            Some(raw) => parse("NOTIFICATIONS_ENABLED", &raw.to_ascii_lowercase())?,
            None => true,
        };

        Ok(Self {
            database_url,
            database_auth: get("DATABASE_AUTH"),
            sensor_namespace: get("SENSOR_NAMESPACE").unwrap_or_else(|| SENSOR_NAMESPACE.into()),
            sensor_key: get("SENSOR_KEY").unwrap_or_else(|| SENSOR_MOISTURE.into()),
            threshold,
            fetch_timeout,
            poll_interval,
            webhook_url: get("ALERT_WEBHOOK_URL"),
            notifications_enabled,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: ToString,
{
    raw.parse().map_err(|e| invalid(var, raw, e))
}

fn positive_secs(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = parse(var, raw)?;
    if secs == 0 {
        return Err(invalid(var, raw, "must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
