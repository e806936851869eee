//! Hosted actor boundary.
//!
//! The comment fetcher only needs one thing from the hosted scraping platform:
//! "run this actor with this input and give me its dataset". That is the
//! [`ActorClient`] trait. [`ApifyClient`] implements it against the Apify v2
//! REST API; tests implement it with canned items.
//!
//! # Run Lifecycle
//!
//! 1. `POST /acts/{actor}/runs?waitForFinish=60` starts the run and blocks
//!    server-side for up to a minute
//! 2. `GET /actor-runs/{run}?waitForFinish=60` is repeated until the run
//!    reaches a terminal status
//! 3. `GET /datasets/{dataset}/items` returns the output in service order

use crate::error::{Result, ScrapeError};
use crate::utils::truncate_for_log;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use tracing::{debug, info, instrument};

pub const APIFY_BASE_URL: &str = "https://api.apify.com/v2";

/// Actor that scrapes comments from an Instagram post URL.
pub const INSTAGRAM_COMMENT_SCRAPER: &str = "SbK00X0JYCPblD2wp";

/// Server-side long-poll window, in seconds.
const WAIT_FOR_FINISH_SECS: u32 = 60;

/// Run a hosted actor to completion and read back its output.
pub trait ActorClient {
    /// Start `actor_id` with `input`, wait for it to finish and return every
    /// item of its default dataset in the order the service returns them.
    fn run_actor(
        &self,
        actor_id: &str,
        input: Value,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;
}

/// Run metadata as returned by the Apify API.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
}

impl RunData {
    fn is_succeeded(&self) -> bool {
        self.status == "SUCCEEDED"
    }

    fn is_failed(&self) -> bool {
        matches!(
            self.status.as_str(),
            "FAILED" | "ABORTED" | "TIMED-OUT" | "TIMING-OUT" | "ABORTING"
        )
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: T,
}

/// Bearer-token client for the Apify REST API.
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for ApifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApifyClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ApifyClient {
    pub fn new(client: Client, base_url: &str, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn start_run(&self, actor_id: &str, input: &Value) -> Result<RunData> {
        let url = format!(
            "{}/acts/{}/runs?waitForFinish={WAIT_FOR_FINISH_SECS}",
            self.base_url,
            urlencoding::encode(actor_id)
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let api_resp: ApiResponse<RunData> = check_status(resp).await?.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run reaches a terminal status.
    async fn wait_for_run(&self, mut run: RunData) -> Result<RunData> {
        loop {
            if run.is_succeeded() {
                return Ok(run);
            }
            if run.is_failed() {
                return Err(ScrapeError::RunFailed(run.status));
            }
            debug!(run_id = %run.id, status = %run.status, "Run still in progress");

            let url = format!(
                "{}/actor-runs/{}?waitForFinish={WAIT_FOR_FINISH_SECS}",
                self.base_url, run.id
            );
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;
            let api_resp: ApiResponse<RunData> = check_status(resp).await?.json().await?;
            run = api_resp.data;
        }
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>> {
        let url = format!(
            "{}/datasets/{}/items?format=json&clean=true",
            self.base_url, dataset_id
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let items: Vec<Value> = check_status(resp).await?.json().await?;
        Ok(items)
    }
}

impl ActorClient for ApifyClient {
    #[instrument(level = "info", skip(self, input))]
    async fn run_actor(&self, actor_id: &str, input: Value) -> Result<Vec<Value>> {
        let run = self.start_run(actor_id, &input).await?;
        info!(run_id = %run.id, status = %run.status, "Actor run started");

        let completed = self.wait_for_run(run).await?;
        info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        let items = self.dataset_items(&completed.default_dataset_id).await?;
        info!(count = items.len(), "Fetched dataset items");
        Ok(items)
    }
}

/// Error bodies are echoed into notices; keep them readable.
const ERROR_BODY_MAX: usize = 300;

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ScrapeError::Api {
        status: status.as_u16(),
        message: truncate_for_log(&body, ERROR_BODY_MAX),
    })
}
