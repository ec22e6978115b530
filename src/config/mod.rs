mod file_config;

pub use file_config::{EmailConfig, FileConfig, SpotifyConfig};

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_DB_PATH: &str = "new_releases.db";
pub const DEFAULT_CONFIG_DB_PATH: &str = "config.db";
pub const DEFAULT_NEW_RELEASE_LIMIT: usize = 20;
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_EMAIL_SUBJECT: &str = "Spotify New Releases";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub catalog_db_path: PathBuf,
    pub config_db_path: PathBuf,
    pub new_release_limit: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_db_path: PathBuf::from(DEFAULT_CATALOG_DB_PATH),
            config_db_path: PathBuf::from(DEFAULT_CONFIG_DB_PATH),
            new_release_limit: DEFAULT_NEW_RELEASE_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_db_path: PathBuf,
    pub config_db_path: PathBuf,
    pub new_release_limit: usize,

    // Phase-specific settings, validated when the phase runs
    pub spotify: Option<SpotifySettings>,
    pub email: Option<EmailSettings>,
}

#[derive(Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub country: Option<String>,
    pub request_interval: Duration,
    pub timeout_sec: u64,
}

impl std::fmt::Debug for SpotifySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifySettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("country", &self.country)
            .field("request_interval", &self.request_interval)
            .field("timeout_sec", &self.timeout_sec)
            .finish()
    }
}

#[derive(Clone)]
pub struct EmailSettings {
    pub sender_email: String,
    pub sender_password: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub subject: String,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"<redacted>")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("subject", &self.subject)
            .finish()
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let catalog_db_path = file
            .catalog_db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.catalog_db_path.clone());
        let config_db_path = file
            .config_db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.config_db_path.clone());
        let new_release_limit = file.new_release_limit.unwrap_or(cli.new_release_limit);

        let spotify = file.spotify.and_then(|spotify| {
            Some(SpotifySettings {
                client_id: spotify.client_id?,
                client_secret: spotify.client_secret?,
                country: file.country.clone(),
                request_interval: Duration::from_millis(spotify.request_interval_ms.unwrap_or(100)),
                timeout_sec: spotify.timeout_sec.unwrap_or(30),
            })
        });

        let email = file.email.and_then(|email| {
            Some(EmailSettings {
                sender_email: email.sender_email?,
                sender_password: email.sender_password.unwrap_or_default(),
                smtp_server: email.smtp_server?,
                smtp_port: email.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
                subject: email
                    .subject
                    .unwrap_or_else(|| DEFAULT_EMAIL_SUBJECT.to_string()),
            })
        });

        Ok(Self {
            catalog_db_path,
            config_db_path,
            new_release_limit,
            spotify,
            email,
        })
    }

    /// Settings needed by the ingestion phase.
    pub fn spotify_settings(&self) -> Result<&SpotifySettings> {
        self.spotify.as_ref().ok_or_else(|| {
            anyhow!("spotify.client_id and spotify.client_secret must be set in the config file")
        })
    }

    /// Release listing limit used by the ingestion phase. Zero fails that phase only.
    pub fn checked_new_release_limit(&self) -> Result<usize> {
        if self.new_release_limit == 0 {
            return Err(anyhow!("new_release_limit must be greater than 0"));
        }
        Ok(self.new_release_limit)
    }

    /// Settings needed by the notification phase.
    pub fn email_settings(&self) -> Result<&EmailSettings> {
        self.email.as_ref().ok_or_else(|| {
            anyhow!("email.sender_email and email.smtp_server must be set in the config file")
        })
    }
}
