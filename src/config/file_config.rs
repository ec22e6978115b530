use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub catalog_db_path: Option<String>,
    pub config_db_path: Option<String>,
    pub new_release_limit: Option<usize>,
    pub country: Option<String>,

    // Per-phase sections
    pub spotify: Option<SpotifyConfig>,
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub request_interval_ms: Option<u64>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct EmailConfig {
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub smtp_server: Option<String>,
    pub smtp_port: Option<u16>,
    pub subject: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
