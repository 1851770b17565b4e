//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use chrono::FixedOffset;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (required): HMAC secret used to sign tokens
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8081
/// - `UTC_OFFSET_HOURS` (optional): offset used for response timestamps, defaults to 7 (Asia/Jakarta)
/// - `DB_MAX_CONNECTIONS` (optional): pool size, defaults to 5
#[derive(Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    pub jwt_secret: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
}

// Secrets stay out of startup logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("server_port", &self.server_port)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment: {0}")]
    Env(#[from] envy::Error),

    #[error("JWT_SECRET must not be empty")]
    EmptySecret,

    #[error("UTC_OFFSET_HOURS out of range: {0}")]
    InvalidUtcOffset(i32),
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8081
}

fn default_utc_offset_hours() -> i32 {
    7
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL, JWT_SECRET)
    /// - Environment variable values cannot be parsed into expected types
    /// - JWT_SECRET is empty or UTC_OFFSET_HOURS is not a valid offset
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // Field names are automatically converted: database_url -> DATABASE_URL
        let config = envy::from_iter::<_, Config>(vars)?;

        if config.jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        config.display_offset()?;

        Ok(config)
    }

    /// Fixed offset applied to timestamps in API responses.
    pub fn display_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/cartrack"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8081);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.display_offset().unwrap().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn secret_is_required_and_non_empty() {
        let missing = Config::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/x")]));
        assert!(matches!(missing, Err(ConfigError::Env(_))));

        let empty = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/x"),
            ("JWT_SECRET", "  "),
        ]));
        assert!(matches!(empty, Err(ConfigError::EmptySecret)));
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/x"),
            ("JWT_SECRET", "s3cret"),
            ("UTC_OFFSET_HOURS", "30"),
        ]));
        assert!(matches!(config, Err(ConfigError::InvalidUtcOffset(30))));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://user:pw@localhost/x"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("pw@"));
    }
}
