//! In-process stand-ins for the catalog API and the mail server.

use release_digest::catalog_api::{
    ArtistDetail, ArtistRef, CatalogApi, CatalogApiError, ImageRef, ReleaseEntry, ReleaseType,
    TrackEntry,
};
use release_digest::notifier::{DigestEmail, MailTransport};
use release_digest::NotifierError;
use rusqlite::Connection;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Scripted catalog with per-call failure injection.
#[derive(Default)]
pub struct FakeCatalogApi {
    releases: Vec<ReleaseEntry>,
    tracks: HashMap<String, Vec<TrackEntry>>,
    artists: HashMap<String, ArtistDetail>,
    failing_track_fetches: HashSet<String>,
    failing_artist_fetches: HashSet<String>,
    failing_listing: bool,
    artist_calls: Cell<usize>,
}

impl FakeCatalogApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist(mut self, id: &str, name: &str, popularity: i64, genres: &[&str]) -> Self {
        self.artists.insert(
            id.to_string(),
            ArtistDetail {
                id: id.to_string(),
                name: name.to_string(),
                popularity,
                genres: genres.iter().map(|g| g.to_string()).collect(),
            },
        );
        self
    }

    /// Add an album; each track is `(track_id, track_name, artist_ids)` and is numbered by position.
    pub fn with_album(
        self,
        id: &str,
        name: &str,
        artist_ids: &[&str],
        tracks: Vec<(&str, &str, Vec<&str>)>,
    ) -> Self {
        self.with_release(id, ReleaseType::Album, name, artist_ids, tracks)
    }

    pub fn with_single(self, id: &str, track_id: &str, name: &str, artist_ids: &[&str]) -> Self {
        self.with_release(
            id,
            ReleaseType::Single,
            name,
            artist_ids,
            vec![(track_id, name, artist_ids.to_vec())],
        )
    }

    pub fn with_compilation(self, id: &str, name: &str, artist_ids: &[&str]) -> Self {
        self.with_release(id, ReleaseType::Other, name, artist_ids, Vec::new())
    }

    fn with_release(
        mut self,
        id: &str,
        release_type: ReleaseType,
        name: &str,
        artist_ids: &[&str],
        tracks: Vec<(&str, &str, Vec<&str>)>,
    ) -> Self {
        self.releases.push(ReleaseEntry {
            id: id.to_string(),
            release_type,
            name: name.to_string(),
            release_date: "2024-01-01".to_string(),
            images: vec![ImageRef {
                url: format!("https://img.example/{}", id),
                height: Some(640),
                width: Some(640),
            }],
            artists: artist_refs(artist_ids),
        });
        self.tracks.insert(
            id.to_string(),
            tracks
                .into_iter()
                .enumerate()
                .map(|(index, (track_id, track_name, artists))| TrackEntry {
                    id: track_id.to_string(),
                    name: track_name.to_string(),
                    track_number: index as i64 + 1,
                    preview_url: Some(format!("https://preview.example/{}", track_id)),
                    artists: artist_refs(&artists),
                })
                .collect(),
        );
        self
    }

    pub fn failing_tracks_of(mut self, release_id: &str) -> Self {
        self.failing_track_fetches.insert(release_id.to_string());
        self
    }

    pub fn failing_artist(mut self, artist_id: &str) -> Self {
        self.failing_artist_fetches.insert(artist_id.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.failing_listing = true;
        self
    }

    pub fn artist_calls(&self) -> usize {
        self.artist_calls.get()
    }
}

fn artist_refs(ids: &[&str]) -> Vec<ArtistRef> {
    ids.iter()
        .map(|id| ArtistRef {
            id: id.to_string(),
            name: format!("Listed {}", id),
        })
        .collect()
}

fn unavailable(endpoint: &str) -> CatalogApiError {
    CatalogApiError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
    }
}

impl CatalogApi for FakeCatalogApi {
    fn list_new_releases(&self, limit: usize) -> Result<Vec<ReleaseEntry>, CatalogApiError> {
        if self.failing_listing {
            return Err(unavailable("browse/new-releases"));
        }
        Ok(self.releases.iter().take(limit).cloned().collect())
    }

    fn fetch_album_tracks(&self, album_id: &str) -> Result<Vec<TrackEntry>, CatalogApiError> {
        if self.failing_track_fetches.contains(album_id) {
            return Err(unavailable("albums/tracks"));
        }
        Ok(self.tracks.get(album_id).cloned().unwrap_or_default())
    }

    fn fetch_artist_detail(&self, artist_id: &str) -> Result<ArtistDetail, CatalogApiError> {
        self.artist_calls.set(self.artist_calls.get() + 1);
        if self.failing_artist_fetches.contains(artist_id) {
            return Err(unavailable("artists"));
        }
        self.artists
            .get(artist_id)
            .cloned()
            .ok_or_else(|| CatalogApiError::Status {
                endpoint: "artists".to_string(),
                status: 404,
            })
    }
}

/// Mail transport that keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: RefCell<Vec<DigestEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<DigestEmail> {
        self.sent.borrow().clone()
    }
}

impl MailTransport for RecordingMailer {
    fn send(&self, email: &DigestEmail) -> Result<(), NotifierError> {
        if self.fail {
            return Err(NotifierError::Smtp("connection refused".to_string()));
        }
        self.sent.borrow_mut().push(email.clone());
        Ok(())
    }
}

/// Create a configuration database holding `recipients` as `(email, name)` pairs.
pub fn create_config_db(dir: &Path, recipients: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("config.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "CREATE TABLE Notification_Recipients (EmailAddress TEXT, Name TEXT)",
        [],
    )
    .unwrap();
    for (email, name) in recipients {
        conn.execute(
            "INSERT INTO Notification_Recipients (EmailAddress, Name) VALUES (?1, ?2)",
            [email, name],
        )
        .unwrap();
    }
    path
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get(0)
    })
    .unwrap()
}
