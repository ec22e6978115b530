//! End-to-end tests for the notification phase: ingest with a fake catalog,
//! then send the digest through a recording transport.

mod common;

use common::*;
use release_digest::ingestion::IncrementalStore;
use release_digest::{run_ingestion, EmailNotifier, NotifierError, NotifyOutcome};
use tempfile::TempDir;

fn notifier(mailer: RecordingMailer) -> EmailNotifier<RecordingMailer> {
    EmailNotifier::new(SENDER_EMAIL.to_string(), SUBJECT.to_string(), mailer)
}

fn ingested_store(dir: &TempDir) -> IncrementalStore {
    let mut store = IncrementalStore::open(dir.path().join("new_releases.db")).unwrap();
    run_ingestion(&sample_catalog(), &mut store, 20, run_date()).unwrap();
    store
}

#[test]
fn test_digest_is_sent_to_hidden_recipients() {
    let dir = TempDir::new().unwrap();
    let store = ingested_store(&dir);
    let config_db = create_config_db(
        dir.path(),
        &[("ann@example.com", "Ann"), ("bob@example.com", "Bob")],
    );
    let notifier = notifier(RecordingMailer::default());

    let outcome = notifier
        .run(store.connection(), &config_db, run_date())
        .unwrap();

    assert_eq!(
        outcome,
        NotifyOutcome::Sent {
            recipients: 2,
            albums: 1,
            singles: 1
        }
    );

    let sent = notifier.transport().sent();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.from, SENDER_EMAIL);
    assert_eq!(email.to, SENDER_EMAIL);
    assert_eq!(email.bcc, vec!["ann@example.com", "bob@example.com"]);
    assert_eq!(email.subject, SUBJECT);

    assert!(email.html.contains("<u>Albums</u>"));
    assert!(email.html.contains("<u>Singles</u>"));
    assert!(email.html.contains("Northern Lights"));
    assert!(email.html.contains("by Aurora Lane"));
    assert!(email.html.contains("Drift</a> ft. Cold Meridian"));
    assert!(email.html.contains("Genres: indie pop, dream pop"));
    assert!(email.html.contains("Low Tide"));
    assert!(email.html.contains("Genres: jazz"));
}

#[test]
fn test_only_releases_of_the_requested_day_are_sent() {
    let dir = TempDir::new().unwrap();
    let mut store = ingested_store(&dir);
    let next_day_api = FakeCatalogApi::new()
        .with_artist(ARTIST_2_ID, "Brass Harbor", 80, &["jazz"])
        .with_album(
            ALBUM_2_ID,
            "Second Wind",
            &[ARTIST_2_ID],
            vec![(TRACK_4_ID, "Gale", vec![ARTIST_2_ID])],
        );
    run_ingestion(&next_day_api, &mut store, 20, next_day()).unwrap();
    let config_db = create_config_db(dir.path(), &[("ann@example.com", "Ann")]);
    let notifier = notifier(RecordingMailer::default());

    let outcome = notifier
        .run(store.connection(), &config_db, next_day())
        .unwrap();

    assert_eq!(
        outcome,
        NotifyOutcome::Sent {
            recipients: 1,
            albums: 1,
            singles: 0
        }
    );
    let html = &notifier.transport().sent()[0].html;
    assert!(html.contains("Second Wind"));
    assert!(!html.contains("Northern Lights"));
    assert!(!html.contains("<u>Singles</u>"));
}

#[test]
fn test_nothing_collected_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let store = ingested_store(&dir);
    let config_db = create_config_db(dir.path(), &[("ann@example.com", "Ann")]);
    let notifier = notifier(RecordingMailer::default());

    let outcome = notifier
        .run(store.connection(), &config_db, next_day())
        .unwrap();

    assert_eq!(outcome, NotifyOutcome::NothingToSend);
    assert!(notifier.transport().sent().is_empty());
}

#[test]
fn test_missing_config_database_fails_the_phase() {
    let dir = TempDir::new().unwrap();
    let store = ingested_store(&dir);
    let missing = dir.path().join("missing-config.db");
    let notifier = notifier(RecordingMailer::default());

    let err = notifier
        .run(store.connection(), &missing, run_date())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<NotifierError>(),
        Some(NotifierError::MissingConfigStore(path)) if path == &missing
    ));
    assert!(notifier.transport().sent().is_empty());
    assert!(!missing.exists());
}

#[test]
fn test_notification_runs_after_failed_ingestion() {
    let dir = TempDir::new().unwrap();
    let mut store = ingested_store(&dir);

    // A later ingestion attempt on the same day fails outright.
    let failed = run_ingestion(
        &sample_catalog().failing_listing(),
        &mut store,
        20,
        run_date(),
    );
    assert!(failed.is_err());

    let config_db = create_config_db(dir.path(), &[("ann@example.com", "Ann")]);
    let notifier = notifier(RecordingMailer::default());
    let outcome = notifier
        .run(store.connection(), &config_db, run_date())
        .unwrap();

    assert!(matches!(outcome, NotifyOutcome::Sent { albums: 1, .. }));
}

#[test]
fn test_transport_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = ingested_store(&dir);
    let config_db = create_config_db(dir.path(), &[("ann@example.com", "Ann")]);
    let notifier = notifier(RecordingMailer::failing());

    let err = notifier
        .run(store.connection(), &config_db, run_date())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<NotifierError>(),
        Some(NotifierError::Smtp(_))
    ));
}
