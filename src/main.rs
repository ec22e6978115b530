use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use release_digest::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_CATALOG_DB_PATH, DEFAULT_CONFIG_DB_PATH,
    DEFAULT_NEW_RELEASE_LIMIT,
};
use release_digest::notifier::SmtpMailer;
use release_digest::{run_job, Phase, SpotifyClient};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database holding the collected releases.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_CATALOG_DB_PATH)]
    pub catalog_db: PathBuf,

    /// Path to the SQLite database holding the recipient list.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_CONFIG_DB_PATH)]
    pub config_db: PathBuf,

    /// How many new releases to request from the catalog.
    #[clap(long, default_value_t = DEFAULT_NEW_RELEASE_LIMIT)]
    pub new_release_limit: usize,

    /// Phase to run.
    #[clap(long, value_enum, default_value_t = Phase::All)]
    pub phase: Phase,

    /// Run date (YYYY-MM-DD). Defaults to today.
    #[clap(long)]
    pub date: Option<NaiveDate>,
}

fn main() -> Result<ExitCode> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        catalog_db_path: cli_args.catalog_db.clone(),
        config_db_path: cli_args.config_db.clone(),
        new_release_limit: cli_args.new_release_limit,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;
    let run_date = cli_args
        .date
        .unwrap_or_else(|| Local::now().date_naive());

    let report = run_job(
        &config,
        cli_args.phase,
        run_date,
        SpotifyClient::connect,
        SmtpMailer::new,
    );

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
