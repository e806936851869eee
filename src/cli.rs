//! Command-line interface definitions.
//!
//! Without a subcommand the binary serves the browser form. `fetch` runs one
//! scrape headlessly and writes the CSV. Most options can also be provided
//! through environment variables.

use crate::models::{
    FetchParams, LIMIT_DEFAULT, LIMIT_MAX, LIMIT_MIN, PAGES_DEFAULT, PAGES_MAX, PAGES_MIN, Source,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Serve the form on the default address
/// berita_scraper
///
/// # Serve on all interfaces with a config file
/// berita_scraper --host 0.0.0.0 --port 8080 --config ./scraper.yaml
///
/// # Fetch three CNN Indonesia pages to a file
/// berita_scraper fetch --source cnn-indonesia --pages 3 --output cnn.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML file overriding endpoints and actor ID
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Apify API token, required for Instagram comments
    #[arg(long, env = "APIFY_TOKEN", hide_env_values = true, global = true)]
    pub apify_token: Option<String>,

    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind the web form to
    #[arg(long, env = "SCRAPER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the web form to
    #[arg(long, env = "SCRAPER_PORT", default_value_t = 8501)]
    pub port: u16,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single fetch and write the result table as CSV
    Fetch(FetchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Which source to scrape
    #[arg(short, long, value_enum, default_value_t = Source::KompasTv)]
    pub source: Source,

    /// CNN Indonesia index pages to walk
    #[arg(long, default_value_t = PAGES_DEFAULT,
          value_parser = clap::value_parser!(u32).range(PAGES_MIN as i64..=PAGES_MAX as i64))]
    pub pages: u32,

    /// Maximum Instagram comments to request
    #[arg(long, default_value_t = LIMIT_DEFAULT,
          value_parser = clap::value_parser!(u32).range(LIMIT_MIN as i64..=LIMIT_MAX as i64))]
    pub limit: u32,

    /// Instagram post URL (required for instagram-comments)
    #[arg(long, default_value = "")]
    pub post_url: String,

    /// CSV file to write; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl FetchArgs {
    pub fn params(&self) -> FetchParams {
        FetchParams {
            source: self.source,
            pages: self.pages,
            limit: self.limit,
            post_url: self.post_url.clone(),
        }
    }
}
