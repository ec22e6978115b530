//! Read side of the catalog: what was collected on a given date.

use super::models::{Digest, DigestAlbum, DigestArtist, DigestSingle, DigestTrack};
use crate::catalog_store::format_collection_date;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::collections::{HashMap, HashSet};

const NEW_ALBUMS_SQL: &str = "SELECT Albums.AlbumID, Albums.Name, Albums.ReleaseDate, Albums.ImageURL, \
     Artists.ArtistID, Artists.Name, Artists.Popularity \
     FROM Albums \
     INNER JOIN Album_Artist ON Albums.AlbumID = Album_Artist.AlbumID \
     INNER JOIN Artists ON Album_Artist.ArtistID = Artists.ArtistID \
     WHERE Albums.CollectionDate = ?1 \
     ORDER BY Artists.Popularity DESC, Albums.AlbumID, Artists.ArtistID";

const ALBUM_TRACKS_SQL: &str = "SELECT Tracks.TrackID, Tracks.Name, Album_Track.TrackNumber, Tracks.PreviewURL \
     FROM Album_Track \
     INNER JOIN Tracks ON Album_Track.TrackID = Tracks.TrackID \
     WHERE Album_Track.AlbumID = ?1 \
     ORDER BY Album_Track.TrackNumber, Album_Track.rowid";

const TRACK_ARTISTS_SQL: &str = "SELECT Artists.ArtistID, Artists.Name \
     FROM Track_Artist \
     INNER JOIN Artists ON Track_Artist.ArtistID = Artists.ArtistID \
     WHERE Track_Artist.TrackID = ?1 \
     ORDER BY Track_Artist.rowid";

const NEW_SINGLES_SQL: &str = "SELECT Tracks.TrackID, Tracks.Name, Tracks.PreviewURL, Tracks.SingleReleaseDate, \
     Tracks.SingleImageURL, Artists.ArtistID, Artists.Name, Artists.Popularity \
     FROM Tracks \
     INNER JOIN Track_Artist ON Tracks.TrackID = Track_Artist.TrackID \
     INNER JOIN Artists ON Track_Artist.ArtistID = Artists.ArtistID \
     WHERE Tracks.SingleCollectionDate = ?1 \
     ORDER BY Artists.Popularity DESC, Tracks.TrackID, Artists.ArtistID";

const ARTIST_GENRES_SQL: &str = "SELECT Genre FROM Artist_Genre WHERE ArtistID = ?1 ORDER BY rowid";

pub struct DigestQuery<'a> {
    conn: &'a Connection,
}

impl<'a> DigestQuery<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Albums and singles whose collection date is `date`.
    pub fn fetch(&self, date: NaiveDate) -> Result<Digest> {
        let albums = self.new_albums(date).context("Failed to query new albums")?;
        let singles = self.new_singles(date).context("Failed to query new singles")?;
        Ok(Digest::new(date, albums, singles))
    }

    /// Albums collected on `date`, ordered by their most popular artist.
    pub fn new_albums(&self, date: NaiveDate) -> Result<Vec<DigestAlbum>> {
        let mut stmt = self.conn.prepare(NEW_ALBUMS_SQL)?;
        let rows = stmt
            .query_map(params![format_collection_date(date)], |row| {
                Ok((
                    DigestAlbum {
                        album_id: row.get(0)?,
                        name: row.get(1)?,
                        release_date: row.get(2)?,
                        image_url: row.get(3)?,
                        artists: Vec::new(),
                        tracks: Vec::new(),
                        genres: Vec::new(),
                    },
                    artist_from_row(row, 4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut albums = group_by_first_seen(rows, |album| album.album_id.clone(), |album, artist| {
            album.artists.push(artist)
        });

        for album in &mut albums {
            let album_artist_ids: HashSet<&str> =
                album.artists.iter().map(|a| a.artist_id.as_str()).collect();
            album.tracks = self.album_tracks(&album.album_id, &album_artist_ids)?;
            album.genres = self.genres_of(&album.artists)?;
        }

        Ok(albums)
    }

    /// Singles collected on `date`, ordered by their most popular artist.
    pub fn new_singles(&self, date: NaiveDate) -> Result<Vec<DigestSingle>> {
        let mut stmt = self.conn.prepare(NEW_SINGLES_SQL)?;
        let rows = stmt
            .query_map(params![format_collection_date(date)], |row| {
                Ok((
                    DigestSingle {
                        track_id: row.get(0)?,
                        name: row.get(1)?,
                        preview_url: row.get(2)?,
                        release_date: row.get(3)?,
                        image_url: row.get(4)?,
                        artists: Vec::new(),
                        genres: Vec::new(),
                    },
                    artist_from_row(row, 5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut singles = group_by_first_seen(rows, |single| single.track_id.clone(), |single, artist| {
            single.artists.push(artist)
        });

        for single in &mut singles {
            single.genres = self.genres_of(&single.artists)?;
        }

        Ok(singles)
    }

    fn album_tracks(&self, album_id: &str, album_artist_ids: &HashSet<&str>) -> Result<Vec<DigestTrack>> {
        let mut stmt = self.conn.prepare(ALBUM_TRACKS_SQL)?;
        let mut tracks = stmt
            .query_map(params![album_id], |row| {
                Ok(DigestTrack {
                    track_id: row.get(0)?,
                    name: row.get(1)?,
                    track_number: row.get(2)?,
                    preview_url: row.get(3)?,
                    featured_artists: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut artists_stmt = self.conn.prepare(TRACK_ARTISTS_SQL)?;
        for track in &mut tracks {
            let artists = artists_stmt
                .query_map(params![track.track_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            track.featured_artists = artists
                .into_iter()
                .filter(|(artist_id, _)| !album_artist_ids.contains(artist_id.as_str()))
                .map(|(_, name)| name)
                .collect();
        }

        Ok(tracks)
    }

    /// Genres of `artists`, in artist order, without repetitions.
    fn genres_of(&self, artists: &[DigestArtist]) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(ARTIST_GENRES_SQL)?;
        let mut seen = HashSet::new();
        let mut genres = Vec::new();
        for artist in artists {
            let artist_genres = stmt
                .query_map(params![artist.artist_id], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            for genre in artist_genres {
                if seen.insert(genre.clone()) {
                    genres.push(genre);
                }
            }
        }
        Ok(genres)
    }
}

fn artist_from_row(row: &Row, offset: usize) -> rusqlite::Result<DigestArtist> {
    Ok(DigestArtist {
        artist_id: row.get(offset)?,
        name: row.get(offset + 1)?,
        popularity: row.get(offset + 2)?,
    })
}

/// Fold joined (item, artist) rows into items, keeping the order in which items first appear.
fn group_by_first_seen<T>(
    rows: Vec<(T, DigestArtist)>,
    key: impl Fn(&T) -> String,
    mut add_artist: impl FnMut(&mut T, DigestArtist),
) -> Vec<T> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut items: Vec<T> = Vec::new();
    for (item, artist) in rows {
        let index = *positions.entry(key(&item)).or_insert_with(|| {
            items.push(item);
            items.len() - 1
        });
        add_artist(&mut items[index], artist);
    }
    items
}
