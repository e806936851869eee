//! Kompas TV headline scraper.
//!
//! Kompas TV exposes a "load more" endpoint that returns an HTML fragment
//! wrapped in JSON. One request, no pagination.
//!
//! # Markup
//!
//! Each headline is an `<h2 class="title-news">` holding an anchor whose text
//! is the title:
//!
//! ```html
//! <h2 class="title-news"><a href="/nasional/123">Judul Berita</a></h2>
//! ```

use crate::error::Result;
use crate::http::get_page;
use crate::models::{FetchOutcome, Headline, Notice, ResultTable};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

pub const KOMPAS_URL: &str = "https://www.kompas.tv/section/more_json?sort_by=&limit=20&offset=0&id=&api_url=&tag=&search=&type=category_news&jsonPath=category_1_18_19_46_1";

pub const HEADLINE_SELECTOR: &str = "h2.title-news";
pub const LINK_SELECTOR: &str = "a";

const FAILURE_MESSAGE: &str = "Gagal mengambil data dari Kompas TV.";

static HEADLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(HEADLINE_SELECTOR).expect("valid Kompas headline selector"));
static LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(LINK_SELECTOR).expect("valid Kompas link selector"));

/// Fetch Kompas TV headlines.
///
/// Never fails: a non-success status or a transport error produces an empty
/// table and exactly one error notice.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - The fragment endpoint, normally [`KOMPAS_URL`]
#[instrument(level = "info", skip(client))]
pub async fn fetch_headlines(client: &Client, url: &str) -> FetchOutcome {
    match index_headlines(client, url).await {
        Ok(headlines) => {
            info!(count = headlines.len(), source = url, "Indexed Kompas TV headlines");
            FetchOutcome::new(ResultTable::Headlines(headlines))
        }
        Err(e) => {
            error!(error = %e, "Kompas TV fetch failed");
            FetchOutcome::failed(
                ResultTable::Headlines(Vec::new()),
                Notice::error(FAILURE_MESSAGE),
            )
        }
    }
}

async fn index_headlines(client: &Client, url: &str) -> Result<Vec<Headline>> {
    let page = get_page(client, url, &[]).await?.error_for_status(url)?;
    let html = unwrap_fragment(&page.body);
    Ok(parse_headlines(&html))
}

/// Pull the HTML out of the JSON envelope.
///
/// All string values are concatenated in document order. A body that is not
/// JSON is returned unchanged and scanned as HTML directly.
pub fn unwrap_fragment(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let mut html = String::new();
            collect_strings(&value, &mut html);
            html
        }
        Err(_) => {
            debug!("Kompas body is not JSON; scanning as HTML");
            body.to_string()
        }
    }
}

fn collect_strings(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

/// Extract headlines from a Kompas TV fragment.
///
/// Takes the first anchor under each `h2.title-news`, trims its text and
/// drops empty titles. Headings without an anchor are skipped.
pub fn parse_headlines(html: &str) -> Vec<Headline> {
    let document = Html::parse_fragment(html);
    document
        .select(&HEADLINE)
        .filter_map(|h2| h2.select(&LINK).next())
        .map(|a| a.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .map(|judul| Headline { judul })
        .collect()
}
