//! CNN Indonesia headline scraper.
//!
//! This module scrapes the paginated national news index at
//! [CNN Indonesia](https://www.cnnindonesia.com/nasional/indeks/3). The site
//! blocks obvious bots, so every request carries a desktop browser User-Agent.
//!
//! # URL Pattern
//!
//! Pages are addressed with a `page` query parameter starting at 1, e.g.
//! `https://www.cnnindonesia.com/nasional/indeks/3?page=2`.
//!
//! # Failure Handling
//!
//! A page that fails is reported as a warning and skipped; the remaining
//! pages are still fetched and their headlines kept in page order.

use crate::error::{Result, ScrapeError};
use crate::http::get_page;
use crate::models::{FetchOutcome, Headline, Notice, ResultTable};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const CNN_BASE_URL: &str = "https://www.cnnindonesia.com/nasional/indeks/3";

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Headline `h2`s carry a long utility-class list; this one is stable.
pub const HEADLINE_SELECTOR: &str = r#"h2[class*="text-cnn_black_light"]"#;

static HEADLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(HEADLINE_SELECTOR).expect("valid CNN headline selector"));

/// Where to fetch from and how to identify.
#[derive(Debug, Clone, Copy)]
pub struct CnnTarget<'a> {
    pub base_url: &'a str,
    pub user_agent: &'a str,
}

/// Build the URL for a single index page.
pub fn page_url(base_url: &str, page: u32) -> Result<String> {
    let mut url =
        Url::parse(base_url).map_err(|e| ScrapeError::Config(format!("{base_url}: {e}")))?;
    url.query_pairs_mut().append_pair("page", &page.to_string());
    Ok(url.into())
}

/// Fetch headlines from pages `1..=pages`, one page at a time.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `target` - Base URL and User-Agent
/// * `pages` - Number of index pages to walk
///
/// # Returns
///
/// Headlines from every page that succeeded, in page order then document
/// order, plus one warning notice per failed page.
#[instrument(level = "info", skip(client, target))]
pub async fn fetch_headlines(client: &Client, target: CnnTarget<'_>, pages: u32) -> FetchOutcome {
    let results: Vec<(u32, Result<Vec<Headline>>)> = stream::iter(1..=pages)
        .then(|page| async move { (page, fetch_page(client, target, page).await) })
        .collect()
        .await;

    let mut headlines = Vec::new();
    let mut notices = Vec::new();
    for (page, result) in results {
        match result {
            Ok(found) => {
                debug!(page, count = found.len(), "Fetched CNN index page");
                headlines.extend(found);
            }
            Err(e) => {
                warn!(page, transport = e.is_transport(), error = %e, "CNN index page failed; skipping");
                notices.push(Notice::warning(page_failure_message(page, &e)));
            }
        }
    }

    info!(
        count = headlines.len(),
        pages,
        failed = notices.len(),
        "Indexed CNN Indonesia headlines"
    );
    FetchOutcome {
        table: ResultTable::Headlines(headlines),
        notices,
    }
}

/// Fetch and parse a single index page
#[instrument(level = "debug", skip(client, target))]
async fn fetch_page(client: &Client, target: CnnTarget<'_>, page: u32) -> Result<Vec<Headline>> {
    let url = page_url(target.base_url, page)?;
    let response = get_page(client, &url, &[("User-Agent", target.user_agent)])
        .await?
        .error_for_status(&url)?;
    Ok(parse_headlines(&response.body))
}

fn page_failure_message(page: u32, error: &ScrapeError) -> String {
    match error {
        ScrapeError::Status { status, .. } => {
            format!("Gagal mengambil halaman {page} | Status: {status}")
        }
        other => format!("Gagal mengambil halaman {page} | {other}"),
    }
}

/// Extract headlines from one index page.
///
/// Every text node inside the heading is trimmed on its own and the pieces
/// are joined with no separator; empty results are dropped.
pub fn parse_headlines(html: &str) -> Vec<Headline> {
    let document = Html::parse_document(html);
    document
        .select(&HEADLINE)
        .map(|h2| {
            h2.text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect::<String>()
        })
        .filter(|title| !title.is_empty())
        .map(|judul| Headline { judul })
        .collect()
}
