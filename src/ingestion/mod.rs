//! Ingestion phase: fetch new releases, extract candidate records and persist
//! the ones the catalog does not hold yet.

mod extractor;
mod key_set;
mod store;

pub use extractor::{CandidateBatch, CandidateRecord, EntityExtractor, ExtractionStats};
pub use key_set::{plan_inserts, InsertPlan, TableRecord};
pub use store::{IncrementalStore, PersistReport, TableOutcome, TableReport};

use crate::catalog_api::CatalogApi;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSummary {
    pub releases: usize,
    pub extraction: ExtractionStats,
    pub report: PersistReport,
}

/// Run one ingestion pass dated `run_date`.
///
/// Failing to list new releases fails the pass. Failed detail fetches and
/// failed tables do not; they show up in the summary.
pub fn run_ingestion(
    api: &dyn CatalogApi,
    store: &mut IncrementalStore,
    new_release_limit: usize,
    run_date: NaiveDate,
) -> Result<IngestionSummary> {
    info!(
        "Starting ingestion for {} (up to {} new releases)",
        run_date, new_release_limit
    );

    let releases = api
        .list_new_releases(new_release_limit)
        .context("Failed to list new releases")?;
    info!("Fetched {} new releases", releases.len());

    let mut extractor = EntityExtractor::new(api, run_date);
    let batch = extractor.extract_all(&releases);
    let extraction = extractor.stats();
    info!(
        "Extracted {} candidate records from {} albums and {} singles ({} skipped)",
        batch.len(),
        extraction.albums,
        extraction.singles,
        extraction.skipped_releases
    );

    let report = store.persist(batch);
    info!(
        "Ingestion finished: {} rows inserted, {} tables failed",
        report.total_inserted(),
        report.failed_tables().len()
    );

    Ok(IngestionSummary {
        releases: releases.len(),
        extraction,
        report,
    })
}
