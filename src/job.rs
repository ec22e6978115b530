//! The scheduled job: run the selected phases, each one isolated from the
//! other's failure.

use crate::catalog_api::{CatalogApi, CatalogApiError};
use crate::catalog_store::open_catalog_db;
use crate::config::{AppConfig, EmailSettings, SpotifySettings};
use crate::ingestion::{run_ingestion, IncrementalStore, IngestionSummary};
use crate::notifier::{EmailNotifier, MailTransport, NotifierError, NotifyOutcome};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::{error, info};

/// Which phases of the job to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Phase {
    All,
    Ingest,
    Notify,
}

impl Phase {
    pub fn ingests(self) -> bool {
        matches!(self, Phase::All | Phase::Ingest)
    }

    pub fn notifies(self) -> bool {
        matches!(self, Phase::All | Phase::Notify)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseStatus {
    Skipped,
    Succeeded,
    /// Holds the full error chain.
    Failed(String),
}

impl PhaseStatus {
    fn from_result<T>(result: Result<T>) -> Self {
        match result {
            Ok(_) => PhaseStatus::Succeeded,
            Err(err) => PhaseStatus::Failed(format!("{:#}", err)),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PhaseStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub ingest: PhaseStatus,
    pub notify: PhaseStatus,
}

impl JobReport {
    /// False if any selected phase failed.
    pub fn succeeded(&self) -> bool {
        !self.ingest.is_failed() && !self.notify.is_failed()
    }
}

/// Collect new releases into the catalog database.
///
/// Any failed table fails the phase, even though the other tables were written.
pub fn run_ingest_phase<A, C>(
    config: &AppConfig,
    run_date: NaiveDate,
    connect: C,
) -> Result<IngestionSummary>
where
    A: CatalogApi,
    C: FnOnce(&SpotifySettings) -> Result<A, CatalogApiError>,
{
    let new_release_limit = config.checked_new_release_limit()?;
    let settings = config.spotify_settings()?;

    let api = connect(settings).context("Failed to connect to the Spotify API")?;
    let mut store = IncrementalStore::open(&config.catalog_db_path)?;

    let summary = run_ingestion(&api, &mut store, new_release_limit, run_date)?;
    let failed_tables = summary.report.failed_tables();
    if !failed_tables.is_empty() {
        bail!("Failed to persist tables: {}", failed_tables.join(", "));
    }
    Ok(summary)
}

/// Email the digest of `run_date`.
pub fn run_notify_phase<T, M>(
    config: &AppConfig,
    run_date: NaiveDate,
    make_transport: M,
) -> Result<NotifyOutcome>
where
    T: MailTransport,
    M: FnOnce(&EmailSettings) -> Result<T, NotifierError>,
{
    let settings = config.email_settings()?;

    let notifier = EmailNotifier::from_settings(settings, make_transport(settings)?);
    let catalog = open_catalog_db(&config.catalog_db_path)?;

    notifier.run(&catalog, &config.config_db_path, run_date)
}

/// Run the phases selected by `phase`. The notify phase runs even when
/// ingestion failed.
pub fn run_job<A, C, T, M>(
    config: &AppConfig,
    phase: Phase,
    run_date: NaiveDate,
    connect: C,
    make_transport: M,
) -> JobReport
where
    A: CatalogApi,
    C: FnOnce(&SpotifySettings) -> Result<A, CatalogApiError>,
    T: MailTransport,
    M: FnOnce(&EmailSettings) -> Result<T, NotifierError>,
{
    let ingest = if phase.ingests() {
        let result = run_ingest_phase(config, run_date, connect);
        match &result {
            Ok(summary) => info!(
                "Data collected from Spotify ({} rows added)",
                summary.report.total_inserted()
            ),
            Err(err) => error!("Ingestion phase failed: {:#}", err),
        }
        PhaseStatus::from_result(result)
    } else {
        PhaseStatus::Skipped
    };

    let notify = if phase.notifies() {
        let result = run_notify_phase(config, run_date, make_transport);
        match &result {
            Ok(NotifyOutcome::NothingToSend) => info!("No new releases"),
            Ok(NotifyOutcome::Sent { recipients, .. }) => {
                info!("Email sent to {} recipients", recipients)
            }
            Err(err) => error!("Notification phase failed: {:#}", err),
        }
        PhaseStatus::from_result(result)
    } else {
        PhaseStatus::Skipped
    };

    JobReport { ingest, notify }
}
