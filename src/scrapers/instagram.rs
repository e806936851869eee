//! Instagram comments via a hosted scraping actor.
//!
//! Nothing is scraped locally: the actor does the work and this module only
//! shapes its input and projects its output into [`Comment`] records.

use crate::apify::ActorClient;
use crate::models::{Comment, FetchOutcome, MISSING_POST_URL, Notice, ResultTable};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

/// Input accepted by the comment scraper actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentScraperInput {
    pub direct_urls: Vec<String>,
    pub results_limit: u32,
    pub is_newest_comments: bool,
    pub include_nested_comments: bool,
}

impl CommentScraperInput {
    /// Newest top-level comments of a single post.
    pub fn newest_first(post_url: &str, limit: u32) -> Self {
        Self {
            direct_urls: vec![post_url.to_string()],
            results_limit: limit,
            is_newest_comments: true,
            include_nested_comments: false,
        }
    }
}

/// Fetch up to `limit` comments from `post_url`.
///
/// An empty URL is rejected before the actor is contacted. Any actor failure
/// yields an empty table and a single error notice carrying the underlying
/// message; partial results are never kept.
#[instrument(level = "info", skip(actor))]
pub async fn fetch_comments<C: ActorClient>(
    actor: &C,
    actor_id: &str,
    post_url: &str,
    limit: u32,
) -> FetchOutcome {
    let post_url = post_url.trim();
    if post_url.is_empty() {
        warn!("No post URL given; not calling actor");
        return FetchOutcome::failed(
            ResultTable::Comments(Vec::new()),
            Notice::error(MISSING_POST_URL),
        );
    }

    let input = match serde_json::to_value(CommentScraperInput::newest_first(post_url, limit)) {
        Ok(input) => input,
        Err(e) => return failure(&e),
    };

    match actor.run_actor(actor_id, input).await {
        Ok(items) => {
            let comments: Vec<Comment> = items.iter().map(project_comment).collect();
            info!(count = comments.len(), "Fetched Instagram comments");
            FetchOutcome::new(ResultTable::Comments(comments))
        }
        Err(e) => failure(&e),
    }
}

fn failure(e: &dyn std::error::Error) -> FetchOutcome {
    error!(error = %e, "Instagram comment fetch failed");
    FetchOutcome::failed(
        ResultTable::Comments(Vec::new()),
        Notice::error(format!("Terjadi kesalahan saat mengambil komentar: {e}")),
    )
}

/// Read `ownerUsername` and `text` from one dataset item; anything missing or
/// not a string becomes an empty string.
pub fn project_comment(item: &Value) -> Comment {
    let field = |name: &str| {
        item.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Comment {
        username: field("ownerUsername"),
        text: field("text"),
    }
}
