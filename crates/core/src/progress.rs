//! Reading progress for a book.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Pages read so far out of the book's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadProgress {
    pub current_page: i64,
    pub total_page: i64,
}

impl ReadProgress {
    /// Build a progress pair, rejecting negative counts and a current page
    /// past the end.
    pub fn new(current_page: i64, total_page: i64) -> Result<Self, CoreError> {
        if current_page < 0 || total_page < 0 {
            return Err(CoreError::Validation(format!(
                "page counts must be >= 0, got {current_page}/{total_page}"
            )));
        }
        if current_page > total_page {
            return Err(CoreError::Validation(format!(
                "current page {current_page} exceeds total {total_page}"
            )));
        }
        Ok(Self {
            current_page,
            total_page,
        })
    }

    /// Rebuild from two nullable columns. Both must be set for a value.
    pub fn from_columns(current_page: Option<i64>, total_page: Option<i64>) -> Option<Self> {
        match (current_page, total_page) {
            (Some(current_page), Some(total_page)) => Some(Self {
                current_page,
                total_page,
            }),
            _ => None,
        }
    }

    /// Fraction read in `0.0..=1.0`; an unknown length counts as unread.
    pub fn fraction(&self) -> f64 {
        if self.total_page <= 0 {
            return 0.0;
        }
        (self.current_page as f64 / self.total_page as f64).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.total_page > 0 && self.current_page >= self.total_page
    }
}
