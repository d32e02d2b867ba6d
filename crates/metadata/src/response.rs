//! Wire shapes of the volumes endpoint and the flattened record built from them.

use booklog_core::defaults::NO_IMAGE_THUMBNAIL_URL;
use serde::{Deserialize, Serialize};

/// Body of `GET /volumes`. Google omits `items` entirely when nothing matched.
#[derive(Debug, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<VolumeItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeItem {
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

/// One search hit, ready to be turned into a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}

impl BookMetadata {
    /// Cover to show in search results: the large thumbnail, then the
    /// small one, then a placeholder.
    pub fn cover_url(&self) -> &str {
        self.thumbnail
            .as_deref()
            .or(self.small_thumbnail.as_deref())
            .unwrap_or(NO_IMAGE_THUMBNAIL_URL)
    }
}

impl From<VolumeItem> for BookMetadata {
    fn from(item: VolumeItem) -> Self {
        let info = item.volume_info;
        let (small_thumbnail, thumbnail) = match info.image_links {
            Some(links) => (links.small_thumbnail, links.thumbnail),
            None => (None, None),
        };
        Self {
            title: info.title,
            authors: info.authors.unwrap_or_default(),
            publisher: info.publisher,
            published_date: info.published_date,
            description: info.description,
            small_thumbnail,
            thumbnail,
        }
    }
}

impl VolumesResponse {
    pub fn into_metadata(self) -> Vec<BookMetadata> {
        self.items.into_iter().map(BookMetadata::from).collect()
    }
}
