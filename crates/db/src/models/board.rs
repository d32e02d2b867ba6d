//! Board entity model and DTOs.

use booklog_core::types::{DbId, Priority, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::Status;

/// A board row from the `boards` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Board {
    pub id: DbId,
    pub name: String,
    pub priority: Priority,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A board together with its statuses in priority order.
#[derive(Debug, Clone, Serialize)]
pub struct BoardWithStatuses {
    #[serde(flatten)]
    pub board: Board,
    pub statuses: Vec<Status>,
}

/// DTO for creating a new board. The board is appended after all others
/// and seeded with the default statuses.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBoard {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// DTO for renaming a board.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBoard {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}
