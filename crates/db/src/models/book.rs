//! Book (board card) entity model and DTOs.

use booklog_core::defaults::NO_IMAGE_THUMBNAIL_URL;
use booklog_core::progress::ReadProgress;
use booklog_core::types::{DbId, Priority, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// A book row from the `books` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub status_id: DbId,
    pub title: String,
    pub priority: Priority,
    pub authors: Json<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(skip_serializing)]
    pub cover_image: Option<Vec<u8>>,
    pub current_page: Option<i64>,
    pub total_page: Option<i64>,
    pub deadline: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Book {
    pub fn progress(&self) -> Option<ReadProgress> {
        ReadProgress::from_columns(self.current_page, self.total_page)
    }

    /// Remote cover to display: the large thumbnail, then the small one,
    /// then a placeholder.
    pub fn cover_url(&self) -> &str {
        self.thumbnail
            .as_deref()
            .or(self.small_thumbnail.as_deref())
            .unwrap_or(NO_IMAGE_THUMBNAIL_URL)
    }

    /// Whether the deadline has passed at `now`.
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.deadline.is_some_and(|deadline| deadline < now)
    }
}

/// DTO for appending a book to a status.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateBook {
    pub status_id: DbId,
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub small_thumbnail: Option<String>,
    #[validate(url)]
    pub thumbnail: Option<String>,
    pub cover_image: Option<Vec<u8>>,
    pub progress: Option<ReadProgress>,
    pub deadline: Option<Timestamp>,
}

/// DTO for updating a book's descriptive fields. All fields are optional;
/// progress and deadline have dedicated setters because they can be cleared.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub small_thumbnail: Option<String>,
    #[validate(url)]
    pub thumbnail: Option<String>,
    pub cover_image: Option<Vec<u8>>,
}
