//! # Berita Scraper
//!
//! Collects Indonesian news headlines and Instagram comments into small
//! tables that can be browsed in a web form and saved as CSV.
//!
//! ## Sources
//!
//! - **Kompas TV**: latest headlines from a JSON-wrapped HTML fragment
//! - **CNN Indonesia**: national news index, walked page by page
//! - **Instagram Comments**: comments on one post through a hosted Apify actor
//!
//! ## Usage
//!
//! ```sh
//! # Web form on http://127.0.0.1:8501
//! APIFY_TOKEN=... berita_scraper
//!
//! # One-off fetch to CSV
//! berita_scraper fetch --source kompas-tv --output kompas_tv_data.csv
//! ```
//!
//! ## Architecture
//!
//! 1. **Input**: the form (or CLI) produces validated [`models::FetchParams`]
//! 2. **Dispatch**: [`dispatch::Scraper`] runs the matching fetcher
//! 3. **Outcome**: every fetch yields a table plus notices, never an error
//! 4. **Output**: the [`session::Session`] renders the table and exports CSV

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod apify;
mod cli;
mod config;
mod dispatch;
mod error;
mod http;
mod models;
mod scrapers;
mod session;
mod templates;
mod utils;
mod web;

use cli::{Cli, Command, FetchArgs};
use config::Settings;
use dispatch::Scraper;
use models::NoticeLevel;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    info!(config = ?args.config, command = ?args.command, "Starting berita_scraper");

    let settings = Settings::load(args.config.as_deref())
        .await?
        .with_token(args.apify_token.clone());
    let scraper = Scraper::from_settings(settings);

    match args.command {
        Some(Command::Fetch(fetch)) => run_fetch(&scraper, &fetch).await,
        None => {
            web::serve(&args.serve.host, args.serve.port, scraper).await?;
            Ok(())
        }
    }
}

/// Run one fetch and write its table as CSV to `--output` or stdout.
///
/// Notices go to stderr so stdout stays clean CSV. An empty table is an error
/// exit, mirroring the form's "no data" state.
#[instrument(level = "info", skip_all, fields(source = %args.source))]
async fn run_fetch(scraper: &Scraper, args: &FetchArgs) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = args.output.as_deref().and_then(Path::parent) {
        if !dir.as_os_str().is_empty() {
            ensure_writable_dir(dir).await?;
        }
    }

    let outcome = scraper.fetch(&args.params()).await;
    for notice in &outcome.notices {
        match notice.level {
            NoticeLevel::Success => info!(message = %notice.message, "Notice"),
            NoticeLevel::Warning => warn!(message = %notice.message, "Notice"),
            NoticeLevel::Error => error!(message = %notice.message, "Notice"),
        }
        eprintln!("{}", notice.message);
    }

    if outcome.table.is_empty() {
        return Err(session::NO_DATA.into());
    }

    let csv = outcome.table.to_csv()?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &csv).await?;
            info!(path = %path.display(), rows = outcome.table.len(), "Wrote CSV");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&csv).await?;
            stdout.flush().await?;
        }
    }
    eprintln!(
        "Berhasil mengambil {} data dari {}",
        outcome.table.len(),
        args.source
    );
    Ok(())
}
