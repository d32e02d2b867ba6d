//! REST client for the Google Books volumes endpoint.

use async_trait::async_trait;
use booklog_core::barcode::Isbn;

use crate::provider::BookMetadataProvider;
use crate::response::{BookMetadata, VolumesResponse};

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// HTTP client for the Google Books API.
pub struct GoogleBooksApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the metadata lookup layer.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status code.
    #[error("Google Books API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The query matched no volume.
    #[error("No books were found")]
    NotFound,
}

impl GoogleBooksApi {
    /// Create a client for `base_url`, e.g. [`DEFAULT_BASE_URL`].
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`], e.g. one
    /// built with a request timeout.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search volumes by free-text keyword.
    pub async fn search(&self, keyword: &str) -> Result<Vec<BookMetadata>, MetadataError> {
        let books = self.volumes(keyword).await?;
        if books.is_empty() {
            return Err(MetadataError::NotFound);
        }
        tracing::debug!(keyword, hits = books.len(), "Metadata search");
        Ok(books)
    }

    /// Fetch the first volume registered under `isbn`.
    pub async fn lookup_isbn(&self, isbn: &Isbn) -> Result<BookMetadata, MetadataError> {
        let query = format!("isbn:{isbn}");
        let book = self
            .volumes(&query)
            .await?
            .into_iter()
            .next()
            .ok_or(MetadataError::NotFound)?;
        tracing::debug!(%isbn, title = %book.title, "ISBN lookup");
        Ok(book)
    }

    // ---- private helpers ----

    /// `GET /volumes?q=<query>`, flattened.
    async fn volumes(&self, query: &str) -> Result<Vec<BookMetadata>, MetadataError> {
        let response = self
            .client
            .get(format!("{}/volumes", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?;

        let body: VolumesResponse = Self::parse_response(response).await?;
        Ok(body.into_metadata())
    }

    /// Ensure the response has a success status code, or turn it into
    /// [`MetadataError::Api`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, MetadataError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Google Books returned an error");
            return Err(MetadataError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, MetadataError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BookMetadataProvider for GoogleBooksApi {
    async fn search(&self, keyword: &str) -> Result<Vec<BookMetadata>, MetadataError> {
        GoogleBooksApi::search(self, keyword).await
    }

    async fn lookup_isbn(&self, isbn: &Isbn) -> Result<BookMetadata, MetadataError> {
        GoogleBooksApi::lookup_isbn(self, isbn).await
    }
}
