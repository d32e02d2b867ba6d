use booklog_core::error::CoreError;
use booklog_metadata::MetadataError;

use crate::config::ConfigError;

/// Application-level error type for the facade.
///
/// Wraps the errors of every lower layer. [`AppError::alert_message`]
/// turns any of them into the text shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `booklog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience type alias for facade return values.
pub type AppResult<T> = Result<T, AppError>;

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";
pub const REQUEST_ERROR_MESSAGE: &str = "An error occurred during the network request";
pub const DUPLICATE_MESSAGE: &str = "An item with the same name already exists";

impl AppError {
    /// User-facing alert text. Unexpected failures are logged here and
    /// collapse to a generic message.
    pub fn alert_message(&self) -> String {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => not_found_message(entity),
                CoreError::Validation(msg) | CoreError::Conflict(msg) => msg.clone(),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    UNKNOWN_ERROR_MESSAGE.to_string()
                }
            },
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Metadata(MetadataError::NotFound) => MetadataError::NotFound.to_string(),
            AppError::Metadata(err) => {
                tracing::warn!(error = %err, "Metadata request failed");
                REQUEST_ERROR_MESSAGE.to_string()
            }
            AppError::Migration(err) => {
                tracing::error!(error = %err, "Migration error");
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            AppError::Config(err) => err.to_string(),
        }
    }
}

fn not_found_message(entity: &str) -> String {
    match entity {
        "board" => "Board cannot be found",
        "status" => "Status cannot be found",
        "book" => "Book cannot be found",
        "tag" => "Tag cannot be found",
        "comment" => "Comment cannot be found",
        _ => "Item cannot be found",
    }
    .to_string()
}

/// - Unique constraint violations become the duplicate-name message.
/// - Everything else is logged and reported as unknown.
fn classify_sqlx_error(err: &sqlx::Error) -> String {
    if booklog_db::is_unique_violation(err) {
        return DUPLICATE_MESSAGE.to_string();
    }
    tracing::error!(error = %err, "Database error");
    UNKNOWN_ERROR_MESSAGE.to_string()
}
