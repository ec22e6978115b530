//! SQLite schema for the new-releases catalog database.
//!
//! Table and column names are shared with databases written by earlier
//! deployments, so existing files are reused without migration.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ForeignKey, Schema, SqlType, Table};

const ALBUMS_TABLE: Table = Table {
    name: "Albums",
    columns: &[
        sqlite_column!("AlbumID", &SqlType::Text),
        sqlite_column!("CollectionDate", &SqlType::Text), // run date, YYYY-MM-DD
        sqlite_column!("Name", &SqlType::Text),
        sqlite_column!("ReleaseDate", &SqlType::Text), // as reported by the API: '2023-05-15', '2023-05', '2023'
        sqlite_column!("ImageURL", &SqlType::Text),
    ],
    primary_key: &["AlbumID"],
    foreign_keys: &[],
};

/// Album tracks leave the Single* columns NULL.
const TRACKS_TABLE: Table = Table {
    name: "Tracks",
    columns: &[
        sqlite_column!("TrackID", &SqlType::Text),
        sqlite_column!("SingleCollectionDate", &SqlType::Text),
        sqlite_column!("Name", &SqlType::Text),
        sqlite_column!("PreviewURL", &SqlType::Text),
        sqlite_column!("SingleTrackNumber", &SqlType::Integer),
        sqlite_column!("SingleReleaseDate", &SqlType::Text),
        sqlite_column!("SingleImageURL", &SqlType::Text),
    ],
    primary_key: &["TrackID"],
    foreign_keys: &[],
};

const ARTISTS_TABLE: Table = Table {
    name: "Artists",
    columns: &[
        sqlite_column!("ArtistID", &SqlType::Text),
        sqlite_column!("Name", &SqlType::Text),
        sqlite_column!("Popularity", &SqlType::Integer),
    ],
    primary_key: &["ArtistID"],
    foreign_keys: &[],
};

const ARTIST_GENRE_TABLE: Table = Table {
    name: "Artist_Genre",
    columns: &[
        sqlite_column!("ArtistID", &SqlType::Text),
        sqlite_column!("Genre", &SqlType::Text),
    ],
    primary_key: &["ArtistID", "Genre"],
    foreign_keys: &[ForeignKey {
        column: "ArtistID",
        foreign_table: "Artists",
        foreign_column: "ArtistID",
    }],
};

const ALBUM_ARTIST_TABLE: Table = Table {
    name: "Album_Artist",
    columns: &[
        sqlite_column!("AlbumID", &SqlType::Text),
        sqlite_column!("ArtistID", &SqlType::Text),
    ],
    primary_key: &["AlbumID", "ArtistID"],
    foreign_keys: &[
        ForeignKey {
            column: "AlbumID",
            foreign_table: "Albums",
            foreign_column: "AlbumID",
        },
        ForeignKey {
            column: "ArtistID",
            foreign_table: "Artists",
            foreign_column: "ArtistID",
        },
    ],
};

const ALBUM_TRACK_TABLE: Table = Table {
    name: "Album_Track",
    columns: &[
        sqlite_column!("AlbumID", &SqlType::Text),
        sqlite_column!("TrackID", &SqlType::Text),
        sqlite_column!("TrackNumber", &SqlType::Integer),
    ],
    primary_key: &["AlbumID", "TrackID"],
    foreign_keys: &[
        ForeignKey {
            column: "AlbumID",
            foreign_table: "Albums",
            foreign_column: "AlbumID",
        },
        ForeignKey {
            column: "TrackID",
            foreign_table: "Tracks",
            foreign_column: "TrackID",
        },
    ],
};

const TRACK_ARTIST_TABLE: Table = Table {
    name: "Track_Artist",
    columns: &[
        sqlite_column!("TrackID", &SqlType::Text),
        sqlite_column!("ArtistID", &SqlType::Text),
    ],
    primary_key: &["TrackID", "ArtistID"],
    foreign_keys: &[
        ForeignKey {
            column: "TrackID",
            foreign_table: "Tracks",
            foreign_column: "TrackID",
        },
        ForeignKey {
            column: "ArtistID",
            foreign_table: "Artists",
            foreign_column: "ArtistID",
        },
    ],
};

pub const CATALOG_SCHEMA: Schema = Schema {
    tables: &[
        ALBUMS_TABLE,
        TRACKS_TABLE,
        ARTISTS_TABLE,
        ARTIST_GENRE_TABLE,
        ALBUM_ARTIST_TABLE,
        ALBUM_TRACK_TABLE,
        TRACK_ARTIST_TABLE,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_albums_create_statement() {
        assert_eq!(
            ALBUMS_TABLE.create_sql(),
            "CREATE TABLE Albums (AlbumID TEXT PRIMARY KEY, CollectionDate TEXT, Name TEXT, \
             ReleaseDate TEXT, ImageURL TEXT);"
        );
    }

    #[test]
    fn test_album_track_create_statement() {
        assert_eq!(
            ALBUM_TRACK_TABLE.create_sql(),
            "CREATE TABLE Album_Track (AlbumID TEXT, TrackID TEXT, TrackNumber INTEGER, \
             PRIMARY KEY (AlbumID, TrackID), \
             FOREIGN KEY (AlbumID) REFERENCES Albums(AlbumID), \
             FOREIGN KEY (TrackID) REFERENCES Tracks(TrackID));"
        );
    }

    #[test]
    fn test_schema_validates_against_hand_written_tables() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Albums (AlbumID TEXT PRIMARY KEY, CollectionDate TEXT, Name TEXT, ReleaseDate TEXT, ImageURL TEXT);
             CREATE TABLE Tracks (TrackID TEXT PRIMARY KEY, SingleCollectionDate TEXT, Name TEXT, PreviewURL TEXT, SingleTrackNumber INTEGER, SingleReleaseDate TEXT, SingleImageURL TEXT);
             CREATE TABLE Artists (ArtistID TEXT PRIMARY KEY, Name TEXT, Popularity INTEGER);
             CREATE TABLE Artist_Genre (ArtistID TEXT, Genre TEXT, PRIMARY KEY (ArtistID, Genre), FOREIGN KEY (ArtistID) REFERENCES Artists(ArtistID));
             CREATE TABLE Album_Artist (AlbumID TEXT, ArtistID TEXT, PRIMARY KEY (AlbumID, ArtistID), FOREIGN KEY (AlbumID) REFERENCES Albums(AlbumID), FOREIGN KEY (ArtistID) REFERENCES Artists(ArtistID));
             CREATE TABLE Album_Track (AlbumID TEXT, TrackID TEXT, TrackNumber INTEGER, PRIMARY KEY (AlbumID, TrackID), FOREIGN KEY (AlbumID) REFERENCES Albums(AlbumID), FOREIGN KEY (TrackID) REFERENCES Tracks(TrackID));
             CREATE TABLE Track_Artist (TrackID TEXT, ArtistID TEXT, PRIMARY KEY (TrackID, ArtistID), FOREIGN KEY (TrackID) REFERENCES Tracks(TrackID), FOREIGN KEY (ArtistID) REFERENCES Artists(ArtistID));",
        )
        .unwrap();

        CATALOG_SCHEMA.validate(&conn).unwrap();
    }
}
