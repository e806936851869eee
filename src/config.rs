//! Endpoint configuration.
//!
//! Every upstream URL, the User-Agent and the actor ID default to the constants
//! in their source modules. An optional YAML file (passed with `--config`) can
//! override any subset of them when a site moves; unknown keys are rejected so
//! typos surface at startup.
//!
//! ```yaml
//! cnn_base_url: "https://www.cnnindonesia.com/nasional/indeks/3"
//! user_agent: "Mozilla/5.0 ..."
//! ```

use crate::apify::{APIFY_BASE_URL, INSTAGRAM_COMMENT_SCRAPER};
use crate::error::{Result, ScrapeError};
use crate::scrapers::{cnn, kompas};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Kompas TV JSON fragment endpoint.
    pub kompas_url: String,
    /// CNN Indonesia index page; `page=<n>` is appended per page.
    pub cnn_base_url: String,
    /// Browser User-Agent sent to CNN Indonesia.
    pub user_agent: String,
    pub apify_base_url: String,
    pub instagram_actor_id: String,
    /// Bearer token for the hosted actor API. Never read from the YAML file.
    #[serde(skip)]
    pub apify_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kompas_url: kompas::KOMPAS_URL.to_string(),
            cnn_base_url: cnn::CNN_BASE_URL.to_string(),
            user_agent: cnn::BROWSER_USER_AGENT.to_string(),
            apify_base_url: APIFY_BASE_URL.to_string(),
            instagram_actor_id: INSTAGRAM_COMMENT_SCRAPER.to_string(),
            apify_token: None,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text, filling unspecified keys with defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    /// Load from an optional file path. `None` yields the built-in defaults.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ScrapeError::Config(format!("{}: {e}", path.display())))?;
        let settings = Self::from_yaml(&text)?;
        info!(path = %path.display(), "Loaded endpoint overrides");
        Ok(settings)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.apify_token = token.filter(|t| !t.trim().is_empty());
        self
    }
}
