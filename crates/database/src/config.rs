//! Configuration loaded from environment variables.

use std::env;

/// Default SQLite URL when `SQLITE_PATH` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:personal_assistant.db?mode=rwc";

/// Default pool size for database connections.
pub const DEFAULT_POOL_SIZE: u32 = 20;

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:personal_assistant.db?mode=rwc` |
    /// | `DATABASE_POOL_SIZE` | Maximum pooled connections | `20` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("SQLITE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidPoolSize(raw)),
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            pool_size,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid DATABASE_POOL_SIZE: {0:?} (expected a positive integer)")]
    InvalidPoolSize(String),
}
