//! Route a fetch request to the matching source.

use crate::apify::{ActorClient, ApifyClient};
use crate::config::Settings;
use crate::models::{FetchOutcome, FetchParams, Notice, ResultTable, Source};
use crate::scrapers::{cnn, instagram, kompas};
use reqwest::Client;
use tracing::{info, instrument, warn};

pub const MISSING_TOKEN: &str =
    "APIFY_TOKEN belum dikonfigurasi; komentar Instagram tidak dapat diambil.";

/// Everything needed to run any of the three fetches.
#[derive(Debug)]
pub struct Scraper<A = ApifyClient> {
    client: Client,
    settings: Settings,
    actor: Option<A>,
}

impl Scraper<ApifyClient> {
    /// Build from settings; the actor client exists only when a token does.
    pub fn from_settings(settings: Settings) -> Self {
        let client = Client::new();
        let actor = settings.apify_token.clone().map(|token| {
            ApifyClient::new(client.clone(), &settings.apify_base_url, token)
        });
        if actor.is_none() {
            warn!("No APIFY_TOKEN configured; Instagram comments are disabled");
        }
        Self::new(client, settings, actor)
    }
}

impl<A: ActorClient> Scraper<A> {
    pub fn new(client: Client, settings: Settings, actor: Option<A>) -> Self {
        Self {
            client,
            settings,
            actor,
        }
    }

    /// Validate `params` and run the matching fetcher.
    ///
    /// Always returns a well-formed outcome. Validation failures are reported
    /// before any network call is made.
    #[instrument(level = "info", skip(self), fields(source = %params.source))]
    pub async fn fetch(&self, params: &FetchParams) -> FetchOutcome {
        if let Err(e) = params.validate() {
            warn!(error = %e, "Rejected fetch parameters");
            return FetchOutcome::failed(params.empty_table(), Notice::error(e.to_string()));
        }

        let outcome = match params.source {
            Source::KompasTv => kompas::fetch_headlines(&self.client, &self.settings.kompas_url).await,
            Source::CnnIndonesia => {
                let target = cnn::CnnTarget {
                    base_url: &self.settings.cnn_base_url,
                    user_agent: &self.settings.user_agent,
                };
                cnn::fetch_headlines(&self.client, target, params.pages).await
            }
            Source::InstagramComments => match &self.actor {
                Some(actor) => {
                    instagram::fetch_comments(
                        actor,
                        &self.settings.instagram_actor_id,
                        &params.post_url,
                        params.limit,
                    )
                    .await
                }
                None => FetchOutcome::failed(
                    ResultTable::Comments(Vec::new()),
                    Notice::error(MISSING_TOKEN),
                ),
            },
        };

        info!(
            rows = outcome.table.len(),
            notices = outcome.notices.len(),
            "Fetch finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apify::test_support::FakeActor;
    use crate::http::test_support;
    use crate::models::{MISSING_POST_URL, NoticeLevel};
    use axum::{Router, routing::get};
    use serde_json::json;

    fn kompas_stub() -> Router {
        Router::new().route(
            "/kompas",
            get(|| async {
                r#"{"html":"<h2 class=\"title-news\"><a href=\"/1\"> Judul Satu </a></h2><h2 class=\"title-news\"><a href=\"/2\">Judul Dua</a></h2>"}"#
            }),
        )
    }

    #[tokio::test]
    async fn test_dispatches_kompas() {
        let base = test_support::spawn(kompas_stub()).await;
        let settings = Settings {
            kompas_url: format!("{base}/kompas"),
            ..Settings::default()
        };
        let scraper: Scraper<FakeActor> = Scraper::new(Client::new(), settings, None);

        let outcome = scraper.fetch(&FetchParams::for_source(Source::KompasTv)).await;
        assert_eq!(outcome.table.rows(), vec![vec!["Judul Satu"], vec!["Judul Dua"]]);
    }

    #[tokio::test]
    async fn test_invalid_pages_rejected_before_network() {
        // Unroutable base; a request would surface a transport warning instead.
        let settings = Settings {
            cnn_base_url: "http://127.0.0.1:1/indeks".to_string(),
            ..Settings::default()
        };
        let scraper: Scraper<FakeActor> = Scraper::new(Client::new(), settings, None);
        let params = FetchParams {
            pages: 11,
            ..FetchParams::for_source(Source::CnnIndonesia)
        };

        let outcome = scraper.fetch(&params).await;
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
        assert!(outcome.notices[0].message.starts_with("Jumlah halaman"));
    }

    #[tokio::test]
    async fn test_empty_post_url_is_validation_error() {
        let scraper = Scraper::new(
            Client::new(),
            Settings::default(),
            Some(FakeActor::new(|| Ok(vec![json!({"text": "x"})]))),
        );

        let outcome = scraper
            .fetch(&FetchParams::for_source(Source::InstagramComments))
            .await;
        assert_eq!(outcome.table, ResultTable::Comments(vec![]));
        assert_eq!(outcome.notices[0].message, MISSING_POST_URL);
        assert!(scraper.actor.as_ref().unwrap().calls().is_empty());
    }

    #[tokio::test]
    async fn test_instagram_without_token() {
        let scraper: Scraper<FakeActor> = Scraper::new(Client::new(), Settings::default(), None);
        let params = FetchParams {
            post_url: "https://www.instagram.com/p/abc/".to_string(),
            ..FetchParams::for_source(Source::InstagramComments)
        };

        let outcome = scraper.fetch(&params).await;
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.notices, vec![Notice::error(MISSING_TOKEN)]);
    }

    #[tokio::test]
    async fn test_instagram_uses_configured_actor() {
        let settings = Settings {
            instagram_actor_id: "someone~comment-scraper".to_string(),
            ..Settings::default()
        };
        let scraper = Scraper::new(
            Client::new(),
            settings,
            Some(FakeActor::new(|| {
                Ok(vec![json!({"ownerUsername": "budi", "text": "Mantap"})])
            })),
        );
        let params = FetchParams {
            post_url: "https://www.instagram.com/p/abc/".to_string(),
            limit: 50,
            ..FetchParams::for_source(Source::InstagramComments)
        };

        let outcome = scraper.fetch(&params).await;
        assert_eq!(outcome.table.rows(), vec![vec!["budi", "Mantap"]]);
        let calls = scraper.actor.as_ref().unwrap().calls();
        assert_eq!(calls[0].0, "someone~comment-scraper");
        assert_eq!(calls[0].1["resultsLimit"], 50);
    }
}
