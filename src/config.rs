use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use log::info;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::countdown::LaunchSchedule;

pub const DEFAULT_REDEEM_ENDPOINT: &str = "http://localhost:8080/redeem";
pub const DEFAULT_REDEEM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Madrid;
pub const DEFAULT_LAUNCH_DAY: u32 = 17;
pub const DEFAULT_BOT_URL: &str = "https://t.me/zodiark_astral_awakening_bot";
pub const DEFAULT_PREFERENCES_FILE: &str = ".tg-promo-prefs.json";

#[derive(Debug)]
pub enum ConfigError {
    InvalidUrl(String, url::ParseError),
    InvalidNumber(String, String),
    InvalidTimezone(String),
    InvalidLaunchOverride(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl(var, e) => write!(f, "{} is not a valid URL: {}", var, e),
            ConfigError::InvalidNumber(var, value) => {
                write!(f, "{} must be a positive integer, got '{}'", var, value)
            }
            ConfigError::InvalidTimezone(value) => {
                write!(f, "LAUNCH_TIMEZONE '{}' is not a known IANA timezone", value)
            }
            ConfigError::InvalidLaunchOverride(value) => write!(
                f,
                "LAUNCH_OVERRIDE_ISO '{}' must look like 2025-11-17T00:00:00 or 2025-11-17T00:00:00+01:00",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub redeem_endpoint: Url,
    pub redeem_timeout: Duration,
    pub launch: LaunchSchedule,
    pub bot_url: String,
    pub test_mode: bool,
    pub preferences_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redeem_endpoint: Url::parse(DEFAULT_REDEEM_ENDPOINT).expect("default endpoint is a valid URL"),
            redeem_timeout: Duration::from_secs(DEFAULT_REDEEM_TIMEOUT_SECS),
            launch: LaunchSchedule::default(),
            bot_url: DEFAULT_BOT_URL.to_string(),
            test_mode: false,
            preferences_file: PathBuf::from(DEFAULT_PREFERENCES_FILE),
        }
    }
}

impl AppConfig {
    /// reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// reads configuration through an arbitrary lookup, unset or empty values use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(endpoint) = get("REDEEM_ENDPOINT") {
            config.redeem_endpoint = Url::parse(&endpoint)
                .map_err(|e| ConfigError::InvalidUrl("REDEEM_ENDPOINT".to_string(), e))?;
        }

        if let Some(secs) = get("REDEEM_TIMEOUT_SECS") {
            let secs = parse_positive("REDEEM_TIMEOUT_SECS", &secs)?;
            config.redeem_timeout = Duration::from_secs(secs);
        }

        if let Some(tz) = get("LAUNCH_TIMEZONE") {
            config.launch.timezone = tz
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(tz.clone()))?;
        }

        if let Some(day) = get("LAUNCH_DAY") {
            let parsed = parse_positive("LAUNCH_DAY", &day)?;
            if parsed > 28 {
                // must exist in every month
                return Err(ConfigError::InvalidNumber("LAUNCH_DAY".to_string(), day));
            }
            config.launch.day_of_month = parsed as u32;
        }

        if let Some(iso) = get("LAUNCH_OVERRIDE_ISO") {
            config.launch.override_at = Some(parse_launch_override(&iso, config.launch.timezone)?);
        }

        if let Some(url) = get("BOT_URL") {
            config.bot_url = url;
        }

        config.test_mode = get("TEST_MODE")
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if let Some(path) = get("PREFERENCES_FILE") {
            config.preferences_file = PathBuf::from(path);
        }

        info!(
            "Configuration loaded: endpoint={}, timeout={}s, timezone={}, test_mode={}",
            config.redeem_endpoint,
            config.redeem_timeout.as_secs(),
            config.launch.timezone,
            config.test_mode
        );

        Ok(config)
    }
}

fn parse_positive(var: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber(var.to_string(), value.to_string())),
    }
}

/// accepts an RFC 3339 instant, a local date-time with or without seconds, or a bare date
///
/// Instants carrying an offset are converted to wall-clock time in `timezone`.
fn parse_launch_override(value: &str, timezone: Tz) -> Result<NaiveDateTime, ConfigError> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&timezone).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ConfigError::InvalidLaunchOverride(value.to_string()))
}
