//! Seam between the facade and the remote metadata source.

use async_trait::async_trait;
use booklog_core::barcode::Isbn;

use crate::google_books::MetadataError;
use crate::response::BookMetadata;

/// A source of book metadata.
#[async_trait]
pub trait BookMetadataProvider: Send + Sync {
    /// Books matching a free-text keyword. Never returns an empty list;
    /// no match is [`MetadataError::NotFound`].
    async fn search(&self, keyword: &str) -> Result<Vec<BookMetadata>, MetadataError>;

    /// The first book registered under `isbn`.
    async fn lookup_isbn(&self, isbn: &Isbn) -> Result<BookMetadata, MetadataError>;
}
