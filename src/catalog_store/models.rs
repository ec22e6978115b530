//! Row types of the catalog database.
//!
//! Every type maps one-to-one to a table. Rows are written once, on first
//! observation, and never updated.

use chrono::NaiveDate;

/// Text format of `CollectionDate` and `SingleCollectionDate`.
pub const COLLECTION_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_collection_date(date: NaiveDate) -> String {
    date.format(COLLECTION_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub album_id: String,
    pub collection_date: NaiveDate,
    pub name: String,
    pub release_date: String,
    pub image_url: Option<String>,
}

/// Fields collected only when the track arrived as a single release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleRelease {
    pub collection_date: NaiveDate,
    pub track_number: i64,
    pub release_date: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub track_id: String,
    pub name: String,
    pub preview_url: Option<String>,
    /// `None` for album tracks.
    pub single: Option<SingleRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    /// Snapshot taken the first time the artist was collected.
    pub popularity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistGenre {
    pub artist_id: String,
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumArtist {
    pub album_id: String,
    pub artist_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumTrack {
    pub album_id: String,
    pub track_id: String,
    pub track_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackArtist {
    pub track_id: String,
    pub artist_id: String,
}
