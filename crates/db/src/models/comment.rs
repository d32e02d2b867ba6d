//! Comment entity model and DTOs.

use booklog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A comment row from the `comments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub book_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a comment to a book.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    pub book_id: DbId,
    #[validate(length(min = 1))]
    pub text: String,
}
