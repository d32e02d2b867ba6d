use std::time::Duration;

use booklog_core::defaults::DEFAULT_BOARD_NAME;
use booklog_metadata::google_books::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
///
/// Every field has a default suitable for running locally.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string (default: `sqlite://booklog.db`).
    pub database_url: String,
    /// Base URL of the Google Books API.
    pub google_books_url: String,
    /// Timeout for metadata requests in seconds (default: `30`).
    pub http_timeout_secs: u64,
    /// Name of the board created when the store is empty.
    pub default_board_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var              | Default                                |
    /// |----------------------|----------------------------------------|
    /// | `DATABASE_URL`       | `sqlite://booklog.db`                  |
    /// | `GOOGLE_BOOKS_URL`   | `https://www.googleapis.com/books/v1`  |
    /// | `HTTP_TIMEOUT_SECS`  | `30`                                   |
    /// | `DEFAULT_BOARD_NAME` | `Default`                              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://booklog.db".into());

        let google_books_url =
            lookup("GOOGLE_BOOKS_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "HTTP_TIMEOUT_SECS",
                        value: raw,
                        expected: "a positive number of seconds",
                    })
                }
            },
            None => 30,
        };

        let default_board_name = match lookup("DEFAULT_BOARD_NAME") {
            Some(name) if name.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    name: "DEFAULT_BOARD_NAME",
                    value: name,
                    expected: "a non-empty board name",
                })
            }
            Some(name) => name.trim().to_string(),
            None => DEFAULT_BOARD_NAME.into(),
        };

        Ok(Self {
            database_url,
            google_books_url,
            http_timeout_secs,
            default_board_name,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
