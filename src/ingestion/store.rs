//! Append-only persistence of candidate batches into the catalog database.
//!
//! Every table is handled on its own: read its key set, plan the inserts,
//! write them in one transaction. A failing table is reported and the
//! remaining tables are still attempted.

use super::extractor::CandidateBatch;
use super::key_set::{plan_inserts, TableRecord};
use crate::catalog_store::{
    format_collection_date, open_catalog_db, Album, AlbumArtist, AlbumTrack, Artist, ArtistGenre,
    Track, TrackArtist,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row, Statement};
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info};

/// Row codec for a record type whose table is written by [`IncrementalStore`].
pub(crate) trait SqliteRecord: TableRecord + Sized {
    const SELECT_KEYS: &'static str;
    const INSERT: &'static str;

    fn key_from_row(row: &Row) -> rusqlite::Result<Self::Key>;

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Inserted {
        candidates: usize,
        inserted: usize,
        already_persisted: usize,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: &'static str,
    pub outcome: TableOutcome,
}

/// Per-table result of one [`IncrementalStore::persist`] call, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub tables: Vec<TableReport>,
}

impl PersistReport {
    /// Rows written to `table`, or `None` if the table failed or was not part of the run.
    pub fn inserted(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|report| report.table == table)
            .and_then(|report| match report.outcome {
                TableOutcome::Inserted { inserted, .. } => Some(inserted),
                TableOutcome::Failed(_) => None,
            })
    }

    pub fn total_inserted(&self) -> usize {
        self.tables
            .iter()
            .map(|report| match report.outcome {
                TableOutcome::Inserted { inserted, .. } => inserted,
                TableOutcome::Failed(_) => 0,
            })
            .sum()
    }

    pub fn failed_tables(&self) -> Vec<&'static str> {
        self.tables
            .iter()
            .filter(|report| matches!(report.outcome, TableOutcome::Failed(_)))
            .map(|report| report.table)
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_tables().is_empty()
    }
}

pub struct IncrementalStore {
    conn: Connection,
}

impl IncrementalStore {
    /// Open (or create) the catalog database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            conn: open_catalog_db(path)?,
        })
    }

    /// Wrap an already opened catalog connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Write the genuinely new records of `batch`.
    ///
    /// Parent tables (albums, artists, tracks) are written before the relation
    /// tables that reference them.
    pub fn persist(&mut self, batch: CandidateBatch) -> PersistReport {
        let CandidateBatch {
            albums,
            tracks,
            artists,
            artist_genres,
            album_artists,
            album_tracks,
            track_artists,
        } = batch;

        let tables = vec![
            self.persist_logged(albums),
            self.persist_logged(artists),
            self.persist_logged(tracks),
            self.persist_logged(artist_genres),
            self.persist_logged(album_artists),
            self.persist_logged(album_tracks),
            self.persist_logged(track_artists),
        ];

        PersistReport { tables }
    }

    fn persist_logged<R: SqliteRecord>(&mut self, records: Vec<R>) -> TableReport {
        let outcome = match self.persist_table(records) {
            Ok(outcome) => {
                if let TableOutcome::Inserted {
                    candidates,
                    inserted,
                    already_persisted,
                } = outcome
                {
                    info!(
                        "{}: {} candidates, {} inserted, {} already persisted",
                        R::TABLE,
                        candidates,
                        inserted,
                        already_persisted
                    );
                }
                outcome
            }
            Err(err) => {
                error!("Failed to persist {}: {:#}", R::TABLE, err);
                TableOutcome::Failed(format!("{:#}", err))
            }
        };

        TableReport {
            table: R::TABLE,
            outcome,
        }
    }

    fn persist_table<R: SqliteRecord>(&mut self, records: Vec<R>) -> Result<TableOutcome> {
        let tx = self.conn.transaction()?;

        let persisted = read_keys::<R>(&tx)?;
        let plan = plan_inserts(records, &persisted);

        {
            let mut stmt = tx.prepare(R::INSERT)?;
            for record in &plan.to_insert {
                record
                    .insert(&mut stmt)
                    .with_context(|| format!("Failed to insert {:?} into {}", record.key(), R::TABLE))?;
            }
        }

        tx.commit()?;

        Ok(TableOutcome::Inserted {
            candidates: plan.candidate_count,
            inserted: plan.to_insert.len(),
            already_persisted: plan.already_persisted,
        })
    }
}

/// Keys currently stored in the table of `R`.
fn read_keys<R: SqliteRecord>(conn: &Connection) -> Result<HashSet<R::Key>> {
    let mut stmt = conn.prepare(R::SELECT_KEYS)?;
    let keys = stmt
        .query_map([], |row| R::key_from_row(row))?
        .collect::<rusqlite::Result<HashSet<_>>>()
        .with_context(|| format!("Failed to read keys of {}", R::TABLE))?;
    Ok(keys)
}

impl SqliteRecord for Album {
    const SELECT_KEYS: &'static str = "SELECT AlbumID FROM Albums";
    const INSERT: &'static str = "INSERT INTO Albums (AlbumID, CollectionDate, Name, ReleaseDate, ImageURL) \
         VALUES (?1, ?2, ?3, ?4, ?5)";

    fn key_from_row(row: &Row) -> rusqlite::Result<String> {
        row.get(0)
    }

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.album_id,
            format_collection_date(self.collection_date),
            self.name,
            self.release_date,
            self.image_url,
        ])
    }
}

impl SqliteRecord for Track {
    const SELECT_KEYS: &'static str = "SELECT TrackID FROM Tracks";
    const INSERT: &'static str = "INSERT INTO Tracks (TrackID, SingleCollectionDate, Name, PreviewURL, \
         SingleTrackNumber, SingleReleaseDate, SingleImageURL) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    fn key_from_row(row: &Row) -> rusqlite::Result<String> {
        row.get(0)
    }

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize> {
        let single = self.single.as_ref();
        stmt.execute(params![
            self.track_id,
            single.map(|s| format_collection_date(s.collection_date)),
            self.name,
            self.preview_url,
            single.map(|s| s.track_number),
            single.map(|s| s.release_date.as_str()),
            single.and_then(|s| s.image_url.as_deref()),
        ])
    }
}

impl SqliteRecord for Artist {
    const SELECT_KEYS: &'static str = "SELECT ArtistID FROM Artists";
    const INSERT: &'static str =
        "INSERT INTO Artists (ArtistID, Name, Popularity) VALUES (?1, ?2, ?3)";

    fn key_from_row(row: &Row) -> rusqlite::Result<String> {
        row.get(0)
    }

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize> {
        stmt.execute(params![self.artist_id, self.name, self.popularity])
    }
}

impl SqliteRecord for ArtistGenre {
    const SELECT_KEYS: &'static str = "SELECT ArtistID, Genre FROM Artist_Genre";
    const INSERT: &'static str = "INSERT INTO Artist_Genre (ArtistID, Genre) VALUES (?1, ?2)";

    fn key_from_row(row: &Row) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize> {
        stmt.execute(params![self.artist_id, self.genre])
    }
}

impl SqliteRecord for AlbumArtist {
    const SELECT_KEYS: &'static str = "SELECT AlbumID, ArtistID FROM Album_Artist";
    const INSERT: &'static str = "INSERT INTO Album_Artist (AlbumID, ArtistID) VALUES (?1, ?2)";

    fn key_from_row(row: &Row) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize> {
        stmt.execute(params![self.album_id, self.artist_id])
    }
}

impl SqliteRecord for AlbumTrack {
    const SELECT_KEYS: &'static str = "SELECT AlbumID, TrackID FROM Album_Track";
    const INSERT: &'static str =
        "INSERT INTO Album_Track (AlbumID, TrackID, TrackNumber) VALUES (?1, ?2, ?3)";

    fn key_from_row(row: &Row) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize> {
        stmt.execute(params![self.album_id, self.track_id, self.track_number])
    }
}

impl SqliteRecord for TrackArtist {
    const SELECT_KEYS: &'static str = "SELECT TrackID, ArtistID FROM Track_Artist";
    const INSERT: &'static str = "INSERT INTO Track_Artist (TrackID, ArtistID) VALUES (?1, ?2)";

    fn key_from_row(row: &Row) -> rusqlite::Result<(String, String)> {
        Ok((row.get(0)?, row.get(1)?))
    }

    fn insert(&self, stmt: &mut Statement) -> rusqlite::Result<usize> {
        stmt.execute(params![self.track_id, self.artist_id])
    }
}
