//! Release Digest Library
//!
//! Collects new releases from the Spotify catalog into a local SQLite
//! database and emails a digest of what was collected each day.

pub mod catalog_api;
pub mod catalog_store;
pub mod config;
pub mod digest;
pub mod ingestion;
pub mod job;
pub mod notifier;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_api::{CatalogApi, CatalogApiError, SpotifyClient};
pub use ingestion::{run_ingestion, IncrementalStore, IngestionSummary};
pub use job::{run_job, JobReport, Phase, PhaseStatus};
pub use notifier::{EmailNotifier, NotifierError, NotifyOutcome};
