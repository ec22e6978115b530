//! Catalog API access.
//!
//! The ingestion pipeline only depends on the [`CatalogApi`] trait; the
//! Spotify Web API client is its production implementation.

mod models;
mod spotify;

pub use models::{ArtistDetail, ArtistRef, ImageRef, ReleaseEntry, ReleaseType, TrackEntry};
pub use spotify::SpotifyClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogApiError {
    #[error("Failed to set up HTTP client: {0}")]
    ClientSetup(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Read access to the music catalog.
///
/// Every call may fail with a transient I/O error; implementations do not retry.
pub trait CatalogApi {
    /// List up to `limit` new releases.
    fn list_new_releases(&self, limit: usize) -> Result<Vec<ReleaseEntry>, CatalogApiError>;

    /// Fetch all tracks of an album or single.
    fn fetch_album_tracks(&self, album_id: &str) -> Result<Vec<TrackEntry>, CatalogApiError>;

    /// Fetch an artist with its current popularity and genres.
    fn fetch_artist_detail(&self, artist_id: &str) -> Result<ArtistDetail, CatalogApiError>;
}
