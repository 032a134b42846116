//! Configuration module for the SkiDráček backend.
//!
//! All configuration is loaded from environment variables with sensible defaults,
//! once at start-up, and handed to the components that need it.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Default Open-Meteo forecast endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Where the admin page sends people who are not signed in.
pub const DEFAULT_SIGN_IN_URL: &str = "/api/auth/signin?provider=google&callbackUrl=%2Fadmin";

/// Where the admin page's sign-out form posts.
pub const DEFAULT_SIGN_OUT_URL: &str = "/api/auth/signout";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Settings for the weather provider.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Forecast endpoint
    pub url: String,
    /// Latitude and longitude of the lift; weather is unknown without them
    pub coordinates: Option<(f64, f64)>,
    /// Deadline for one provider call
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Human-readable or JSON log lines
    pub log_format: LogFormat,
    /// Comma-separated admin emails used when the allowlist block is absent
    pub allowed_admins: Option<String>,
    /// Secret shared with the sign-in service for session tokens
    pub session_secret: Option<String>,
    /// Sign-in link shown on the admin page
    pub sign_in_url: String,
    /// Sign-out form target on the admin page
    pub sign_out_url: String,
    /// Shared-cache lifetime for public content reads, in seconds
    pub content_max_age_secs: u64,
    pub weather: WeatherConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("SKI_DB_PATH")
            .unwrap_or_else(|_| "./data/content.sqlite".to_string())
            .into();

        let bind_addr = env::var("SKI_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid SKI_BIND_ADDR: {}", e)))?;

        let log_level = env::var("SKI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("SKI_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let allowed_admins = non_empty_var("SKI_ALLOWED_ADMINS");
        let session_secret = non_empty_var("SKI_SESSION_SECRET");

        let sign_in_url =
            env::var("SKI_SIGN_IN_URL").unwrap_or_else(|_| DEFAULT_SIGN_IN_URL.to_string());
        let sign_out_url =
            env::var("SKI_SIGN_OUT_URL").unwrap_or_else(|_| DEFAULT_SIGN_OUT_URL.to_string());

        let content_max_age_secs = parse_var("SKI_CONTENT_MAX_AGE_SECS", 3600)?;

        let coordinates = match (non_empty_var("SKI_WEATHER_LAT"), non_empty_var("SKI_WEATHER_LON")) {
            (Some(lat), Some(lon)) => Some((
                parse_coordinate("SKI_WEATHER_LAT", &lat)?,
                parse_coordinate("SKI_WEATHER_LON", &lon)?,
            )),
            _ => None,
        };

        let weather = WeatherConfig {
            url: env::var("SKI_WEATHER_URL").unwrap_or_else(|_| DEFAULT_WEATHER_URL.to_string()),
            coordinates,
            timeout: Duration::from_millis(parse_var("SKI_WEATHER_TIMEOUT_MS", 2500)?),
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            allowed_admins,
            session_secret,
            sign_in_url,
            sign_out_url,
            content_max_age_secs,
            weather,
        })
    }

    /// `Cache-Control` value for public content reads.
    pub fn content_cache_control(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate=60",
            self.content_max_age_secs
        )
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var(name: &str, default: u64) -> Result<u64, AppError> {
    match non_empty_var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
    }
}

fn parse_coordinate(name: &str, value: &str) -> Result<f64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Configuration(format!("Invalid {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for name in [
            "SKI_DB_PATH",
            "SKI_BIND_ADDR",
            "SKI_LOG_LEVEL",
            "SKI_LOG_FORMAT",
            "SKI_ALLOWED_ADMINS",
            "SKI_SESSION_SECRET",
            "SKI_SIGN_IN_URL",
            "SKI_SIGN_OUT_URL",
            "SKI_CONTENT_MAX_AGE_SECS",
            "SKI_WEATHER_LAT",
            "SKI_WEATHER_LON",
            "SKI_WEATHER_URL",
            "SKI_WEATHER_TIMEOUT_MS",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/content.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.allowed_admins.is_none());
        assert!(config.session_secret.is_none());
        assert_eq!(config.sign_in_url, DEFAULT_SIGN_IN_URL);
        assert_eq!(config.sign_out_url, DEFAULT_SIGN_OUT_URL);
        assert_eq!(config.weather.url, DEFAULT_WEATHER_URL);
        assert!(config.weather.coordinates.is_none());
        assert_eq!(config.weather.timeout, Duration::from_millis(2500));
        assert_eq!(
            config.content_cache_control(),
            "public, s-maxage=3600, stale-while-revalidate=60"
        );
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_coordinate("LAT", " 50.61 ").unwrap(), 50.61);
        assert!(matches!(
            parse_coordinate("LAT", "north"),
            Err(AppError::Configuration(_))
        ));
        assert_eq!(parse_var("SKI_TEST_UNSET_VARIABLE", 42).unwrap(), 42);
    }
}
