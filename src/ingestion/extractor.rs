//! Flattens release entries into candidate records for the seven catalog tables.

use crate::catalog_api::{ArtistDetail, CatalogApi, ReleaseEntry, ReleaseType, TrackEntry};
use crate::catalog_store::{
    Album, AlbumArtist, AlbumTrack, Artist, ArtistGenre, SingleRelease, Track, TrackArtist,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One row derived from this run's fetched data, not yet checked against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateRecord {
    Album(Album),
    Track(Track),
    Artist(Artist),
    ArtistGenre(ArtistGenre),
    AlbumArtist(AlbumArtist),
    AlbumTrack(AlbumTrack),
    TrackArtist(TrackArtist),
}

/// Candidate records of one run, grouped per table in observation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBatch {
    pub albums: Vec<Album>,
    pub tracks: Vec<Track>,
    pub artists: Vec<Artist>,
    pub artist_genres: Vec<ArtistGenre>,
    pub album_artists: Vec<AlbumArtist>,
    pub album_tracks: Vec<AlbumTrack>,
    pub track_artists: Vec<TrackArtist>,
}

impl CandidateBatch {
    pub fn push(&mut self, record: CandidateRecord) {
        match record {
            CandidateRecord::Album(r) => self.albums.push(r),
            CandidateRecord::Track(r) => self.tracks.push(r),
            CandidateRecord::Artist(r) => self.artists.push(r),
            CandidateRecord::ArtistGenre(r) => self.artist_genres.push(r),
            CandidateRecord::AlbumArtist(r) => self.album_artists.push(r),
            CandidateRecord::AlbumTrack(r) => self.album_tracks.push(r),
            CandidateRecord::TrackArtist(r) => self.track_artists.push(r),
        }
    }

    pub fn len(&self) -> usize {
        self.albums.len()
            + self.tracks.len()
            + self.artists.len()
            + self.artist_genres.len()
            + self.album_artists.len()
            + self.album_tracks.len()
            + self.track_artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<CandidateRecord> for CandidateBatch {
    fn extend<I: IntoIterator<Item = CandidateRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

impl FromIterator<CandidateRecord> for CandidateBatch {
    fn from_iter<I: IntoIterator<Item = CandidateRecord>>(iter: I) -> Self {
        let mut batch = CandidateBatch::default();
        batch.extend(iter);
        batch
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub albums: usize,
    pub singles: usize,
    pub skipped_releases: usize,
    pub failed_track_fetches: usize,
    pub failed_artist_fetches: usize,
}

/// Walks release entries (release, tracks, artists, genres) for one run.
///
/// Artist details are fetched at most once per run. Failed fetches only drop
/// the records that depend on them.
pub struct EntityExtractor<'a> {
    api: &'a dyn CatalogApi,
    run_date: NaiveDate,
    artist_cache: HashMap<String, Option<ArtistDetail>>,
    stats: ExtractionStats,
}

impl<'a> EntityExtractor<'a> {
    pub fn new(api: &'a dyn CatalogApi, run_date: NaiveDate) -> Self {
        Self {
            api,
            run_date,
            artist_cache: HashMap::new(),
            stats: ExtractionStats::default(),
        }
    }

    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }

    pub fn extract_all(&mut self, entries: &[ReleaseEntry]) -> CandidateBatch {
        let mut batch = CandidateBatch::default();
        for entry in entries {
            batch.extend(self.extract(entry));
        }
        batch
    }

    /// Candidate records implied by one release entry.
    pub fn extract(&mut self, entry: &ReleaseEntry) -> Vec<CandidateRecord> {
        match entry.release_type {
            ReleaseType::Album => {
                self.stats.albums += 1;
                self.extract_album(entry)
            }
            ReleaseType::Single => {
                self.stats.singles += 1;
                self.extract_single(entry)
            }
            ReleaseType::Other => {
                debug!("Skipping release {} ({}): not an album or single", entry.id, entry.name);
                self.stats.skipped_releases += 1;
                Vec::new()
            }
        }
    }

    fn extract_album(&mut self, entry: &ReleaseEntry) -> Vec<CandidateRecord> {
        let mut records = vec![CandidateRecord::Album(Album {
            album_id: entry.id.clone(),
            collection_date: self.run_date,
            name: entry.name.clone(),
            release_date: entry.release_date.clone(),
            image_url: entry.image_url().map(str::to_string),
        })];

        for artist in &entry.artists {
            if self.push_artist(&artist.id, &mut records) {
                records.push(CandidateRecord::AlbumArtist(AlbumArtist {
                    album_id: entry.id.clone(),
                    artist_id: artist.id.clone(),
                }));
            }
        }

        let Some(tracks) = self.fetch_tracks(entry) else {
            return records;
        };

        for track in tracks {
            records.push(CandidateRecord::Track(Track {
                track_id: track.id.clone(),
                name: track.name.clone(),
                preview_url: track.preview_url.clone(),
                single: None,
            }));
            records.push(CandidateRecord::AlbumTrack(AlbumTrack {
                album_id: entry.id.clone(),
                track_id: track.id.clone(),
                track_number: track.track_number,
            }));
            self.push_track_artists(&track, &mut records);
        }

        records
    }

    fn extract_single(&mut self, entry: &ReleaseEntry) -> Vec<CandidateRecord> {
        let Some(tracks) = self.fetch_tracks(entry) else {
            return Vec::new();
        };

        let mut records = Vec::new();
        for track in tracks {
            records.push(CandidateRecord::Track(Track {
                track_id: track.id.clone(),
                name: track.name.clone(),
                preview_url: track.preview_url.clone(),
                single: Some(SingleRelease {
                    collection_date: self.run_date,
                    track_number: track.track_number,
                    release_date: entry.release_date.clone(),
                    image_url: entry.image_url().map(str::to_string),
                }),
            }));
            self.push_track_artists(&track, &mut records);
        }

        records
    }

    fn fetch_tracks(&mut self, entry: &ReleaseEntry) -> Option<Vec<TrackEntry>> {
        match self.api.fetch_album_tracks(&entry.id) {
            Ok(tracks) => Some(tracks),
            Err(err) => {
                warn!("Skipping tracks of release {} ({}): {}", entry.id, entry.name, err);
                self.stats.failed_track_fetches += 1;
                None
            }
        }
    }

    fn push_track_artists(&mut self, track: &TrackEntry, records: &mut Vec<CandidateRecord>) {
        for artist in &track.artists {
            if self.push_artist(&artist.id, records) {
                records.push(CandidateRecord::TrackArtist(TrackArtist {
                    track_id: track.id.clone(),
                    artist_id: artist.id.clone(),
                }));
            }
        }
    }

    /// Push the artist and its genres. Returns false if the artist could not be resolved.
    fn push_artist(&mut self, artist_id: &str, records: &mut Vec<CandidateRecord>) -> bool {
        let Some(detail) = self.resolve_artist(artist_id) else {
            return false;
        };

        records.push(CandidateRecord::Artist(Artist {
            artist_id: artist_id.to_string(),
            name: detail.name.clone(),
            popularity: detail.popularity,
        }));
        records.extend(detail.genres.iter().map(|genre| {
            CandidateRecord::ArtistGenre(ArtistGenre {
                artist_id: artist_id.to_string(),
                genre: genre.clone(),
            })
        }));
        true
    }

    fn resolve_artist(&mut self, artist_id: &str) -> Option<ArtistDetail> {
        if let Some(cached) = self.artist_cache.get(artist_id) {
            return cached.clone();
        }

        let detail = match self.api.fetch_artist_detail(artist_id) {
            Ok(detail) => Some(detail),
            Err(err) => {
                warn!("Skipping artist {}: {}", artist_id, err);
                self.stats.failed_artist_fetches += 1;
                None
            }
        };
        self.artist_cache
            .insert(artist_id.to_string(), detail.clone());
        detail
    }
}
