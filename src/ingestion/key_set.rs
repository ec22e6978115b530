//! Pure insert planning over primary-key sets.
//!
//! Each table is modelled as the keys it already holds plus the run's
//! candidate records. Planning needs no database: collapse the candidates to
//! one record per key, then keep only the keys the table does not hold yet.

use crate::catalog_store::{
    Album, AlbumArtist, AlbumTrack, Artist, ArtistGenre, Track, TrackArtist,
};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A row type identified by its table's primary key.
pub trait TableRecord {
    type Key: Eq + Hash + Clone + Debug;

    /// Name of the table the record is stored in.
    const TABLE: &'static str;

    fn key(&self) -> Self::Key;

    /// Fold a later record with the same key into this one. The later record
    /// replaces this one unless the row type says otherwise.
    fn absorb(&mut self, later: Self)
    where
        Self: Sized,
    {
        *self = later;
    }
}

/// Records to write for one table, with the counts that led to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan<R> {
    pub to_insert: Vec<R>,
    pub candidate_count: usize,
    pub unique_count: usize,
    pub already_persisted: usize,
}

/// Collapse `candidates` to one record per key and drop every key in `persisted`.
///
/// When the same key appears more than once the last record wins, placed at
/// the position where the key was first seen. [`TableRecord::absorb`] decides
/// what "wins" means for row types that keep fields from earlier duplicates.
pub fn plan_inserts<R: TableRecord>(candidates: Vec<R>, persisted: &HashSet<R::Key>) -> InsertPlan<R> {
    let candidate_count = candidates.len();

    let mut positions: HashMap<R::Key, usize> = HashMap::with_capacity(candidate_count);
    let mut unique: Vec<R> = Vec::with_capacity(candidate_count);
    for record in candidates {
        let key = record.key();
        match positions.get(&key) {
            Some(&index) => unique[index].absorb(record),
            None => {
                positions.insert(key, unique.len());
                unique.push(record);
            }
        }
    }

    let unique_count = unique.len();
    let to_insert: Vec<R> = unique
        .into_iter()
        .filter(|record| !persisted.contains(&record.key()))
        .collect();

    InsertPlan {
        already_persisted: unique_count - to_insert.len(),
        to_insert,
        candidate_count,
        unique_count,
    }
}

impl TableRecord for Album {
    type Key = String;
    const TABLE: &'static str = "Albums";

    fn key(&self) -> String {
        self.album_id.clone()
    }
}

impl TableRecord for Track {
    type Key = String;
    const TABLE: &'static str = "Tracks";

    fn key(&self) -> String {
        self.track_id.clone()
    }

    // Single fields stay set when the same track is also seen on an album.
    fn absorb(&mut self, later: Track) {
        let single = self.single.take();
        *self = later;
        if self.single.is_none() {
            self.single = single;
        }
    }
}

impl TableRecord for Artist {
    type Key = String;
    const TABLE: &'static str = "Artists";

    fn key(&self) -> String {
        self.artist_id.clone()
    }
}

impl TableRecord for ArtistGenre {
    type Key = (String, String);
    const TABLE: &'static str = "Artist_Genre";

    fn key(&self) -> (String, String) {
        (self.artist_id.clone(), self.genre.clone())
    }
}

impl TableRecord for AlbumArtist {
    type Key = (String, String);
    const TABLE: &'static str = "Album_Artist";

    fn key(&self) -> (String, String) {
        (self.album_id.clone(), self.artist_id.clone())
    }
}

impl TableRecord for AlbumTrack {
    type Key = (String, String);
    const TABLE: &'static str = "Album_Track";

    fn key(&self) -> (String, String) {
        (self.album_id.clone(), self.track_id.clone())
    }
}

impl TableRecord for TrackArtist {
    type Key = (String, String);
    const TABLE: &'static str = "Track_Artist";

    fn key(&self) -> (String, String) {
        (self.track_id.clone(), self.artist_id.clone())
    }
}
