//! Shapes of the catalog API responses consumed by the ingestion pipeline.

use serde::Deserialize;

/// Kind of a new-release entry. Anything other than albums and singles
/// (compilations, appearances) is skipped by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Album,
    Single,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// One entry of the new-releases listing: a full album or a single.
///
/// Tracks are not part of the listing; they are fetched per release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseEntry {
    pub id: String,
    #[serde(rename = "album_type")]
    pub release_type: ReleaseType,
    pub name: String,
    pub release_date: String,
    /// Largest first.
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

impl ReleaseEntry {
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackEntry {
    pub id: String,
    pub name: String,
    pub track_number: i64,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtistDetail {
    pub id: String,
    pub name: String,
    pub popularity: i64,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// A page of a paginated listing.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewReleasesResponse {
    pub albums: Page<ReleaseEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}
