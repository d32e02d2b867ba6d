//! Status (board column) entity model and DTOs.

use booklog_core::types::{DbId, Priority, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A status row from the `statuses` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Status {
    pub id: DbId,
    pub board_id: DbId,
    pub title: String,
    pub priority: Priority,
    /// Six hex digits, no leading `#`.
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a status to a board.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStatus {
    pub board_id: DbId,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(equal = 6))]
    pub color: String,
}

/// DTO for updating a status. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStatus {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(equal = 6))]
    pub color: Option<String>,
}
