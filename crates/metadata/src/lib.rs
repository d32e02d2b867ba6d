//! Book metadata lookup.
//!
//! [`GoogleBooksApi`] queries the Google Books volumes endpoint by keyword
//! or ISBN and flattens each volume into a [`BookMetadata`]. The facade
//! depends on the [`BookMetadataProvider`] trait so tests can substitute a
//! canned provider.

pub mod google_books;
pub mod provider;
pub mod response;

pub use google_books::{GoogleBooksApi, MetadataError};
pub use provider::BookMetadataProvider;
pub use response::BookMetadata;
