//! Tag entity model and DTOs.

use booklog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A tag row from the `tags` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a tag. A random colour is picked when `color` is `None`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTag {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(equal = 6))]
    pub color: Option<String>,
}

/// DTO for updating a tag. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTag {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(equal = 6))]
    pub color: Option<String>,
}
