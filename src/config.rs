use crate::domain::schedule::HolidayPolicy;
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEZONE: &str = "Europe/Madrid";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: String,
    pub backend_anon_key: String,
    pub cache_path: PathBuf,
    pub timezone: Tz,
    pub holiday_policy: HolidayPolicy,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let backend_url = env::var("BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingBackendUrl)?;

        let backend_anon_key = env::var("BACKEND_ANON_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingAnonKey)?;

        let cache_path = env::var("CACHE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_cache_path(env::var("HOME").ok()));

        let timezone = parse_timezone(
            &env::var("TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string()),
        )?;

        let holiday_policy = match env::var("HOLIDAY_POLICY") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidHolidayPolicy(raw))?,
            Err(_) => HolidayPolicy::default(),
        };

        let http_timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Config {
            backend_url,
            backend_anon_key,
            cache_path,
            timezone,
            holiday_policy,
            http_timeout_secs,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_cache_path(home: Option<String>) -> PathBuf {
    let base = home
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .unwrap_or_default();
    base.join(".careshift").join("cache.json")
}

fn parse_timezone(raw: &str) -> Result<Tz, ConfigError> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(raw.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BACKEND_URL environment variable not set")]
    MissingBackendUrl,

    #[error("BACKEND_ANON_KEY environment variable not set")]
    MissingAnonKey,

    #[error("Invalid time zone: {0}")]
    InvalidTimezone(String),

    #[error(
        "Invalid holiday policy: {0} \
         (expected registered, registered_or_weekend or registered_or_sunday)"
    )]
    InvalidHolidayPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_path_under_home() {
        assert_eq!(
            default_cache_path(Some("/home/ana".to_string())),
            PathBuf::from("/home/ana/.careshift/cache.json")
        );
    }

    #[test]
    fn test_default_cache_path_without_home_is_relative() {
        assert_eq!(default_cache_path(None), PathBuf::from(".careshift/cache.json"));
        assert_eq!(
            default_cache_path(Some(String::new())),
            PathBuf::from(".careshift/cache.json")
        );
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Madrid").unwrap(), chrono_tz::Europe::Madrid);
        assert_eq!(parse_timezone(" Atlantic/Canary ").unwrap(), chrono_tz::Atlantic::Canary);
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(ConfigError::InvalidTimezone(_))
        ));
    }
}
