//! Notification phase: email the digest of a date to the configured recipients.

mod mailer;
mod recipients;

pub use mailer::{DigestEmail, MailTransport, SmtpMailer, SmtpSecurity, IMPLICIT_TLS_PORT};
pub use recipients::{load_recipients, Recipient};

use crate::config::EmailSettings;
use crate::digest::{render_digest_html, DigestQuery};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Configuration database not found: {0:?}")]
    MissingConfigStore(PathBuf),

    #[error("Configuration database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid email address {address:?}: {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Failed to build email: {0}")]
    Message(String),

    #[error("Failed to send email: {0}")]
    Smtp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    NothingToSend,
    Sent {
        recipients: usize,
        albums: usize,
        singles: usize,
    },
}

pub struct EmailNotifier<T: MailTransport> {
    sender_email: String,
    subject: String,
    transport: T,
}

impl<T: MailTransport> EmailNotifier<T> {
    pub fn new(sender_email: String, subject: String, transport: T) -> Self {
        Self {
            sender_email,
            subject,
            transport,
        }
    }

    pub fn from_settings(settings: &EmailSettings, transport: T) -> Self {
        Self::new(
            settings.sender_email.clone(),
            settings.subject.clone(),
            transport,
        )
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the digest of `date`, unless nothing was collected that day.
    ///
    /// Recipients are loaded first, so a missing configuration database fails
    /// the phase even on days without new releases.
    pub fn run(&self, catalog: &Connection, config_db_path: &Path, date: NaiveDate) -> Result<NotifyOutcome> {
        let recipients = load_recipients(config_db_path)?;
        if recipients.is_empty() {
            warn!("No recipients configured in {:?}", config_db_path);
        }

        let digest = DigestQuery::new(catalog).fetch(date)?;
        if digest.is_empty() {
            info!("No new releases collected on {}, nothing to send", date);
            return Ok(NotifyOutcome::NothingToSend);
        }

        let email = DigestEmail {
            from: self.sender_email.clone(),
            to: self.sender_email.clone(),
            bcc: recipients.iter().map(|r| r.email_address.clone()).collect(),
            subject: self.subject.clone(),
            html: render_digest_html(&digest),
        };
        self.transport.send(&email)?;

        info!(
            "Sent digest for {} ({} albums, {} singles) to {} recipients",
            date,
            digest.albums.len(),
            digest.singles.len(),
            recipients.len()
        );

        Ok(NotifyOutcome::Sent {
            recipients: recipients.len(),
            albums: digest.albums.len(),
            singles: digest.singles.len(),
        })
    }
}
