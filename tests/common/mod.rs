//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeCatalogApi, run_date};
//!
//! #[test]
//! fn test_ingest() {
//!     let api = FakeCatalogApi::new().with_artist(ARTIST_1_ID, "Artist", 50, &[]);
//!     // ...
//! }
//! ```

#![allow(dead_code)]

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{count_rows, create_config_db, FakeCatalogApi, RecordingMailer};

use chrono::NaiveDate;

pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

pub fn next_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
}

/// A catalog with one album (two tracks, one featuring a guest) and one single.
pub fn sample_catalog() -> FakeCatalogApi {
    FakeCatalogApi::new()
        .with_artist(ARTIST_1_ID, "Aurora Lane", 50, &["indie pop", "dream pop"])
        .with_artist(ARTIST_2_ID, "Brass Harbor", 80, &["jazz"])
        .with_artist(ARTIST_3_ID, "Cold Meridian", 30, &[])
        .with_album(
            ALBUM_1_ID,
            "Northern Lights",
            &[ARTIST_1_ID],
            vec![
                (TRACK_1_ID, "Polaris", vec![ARTIST_1_ID]),
                (TRACK_2_ID, "Drift", vec![ARTIST_1_ID, ARTIST_3_ID]),
            ],
        )
        .with_single(SINGLE_1_ID, TRACK_3_ID, "Low Tide", &[ARTIST_2_ID])
}
