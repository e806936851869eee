//! Plain HTTP GET used by the news scrapers.
//!
//! One request, optional headers, no retries. Timeouts are whatever `reqwest`
//! defaults to.

use crate::error::{Result, ScrapeError};
use reqwest::Client;
use tracing::{debug, instrument};

/// Status code and raw body of a completed GET.
#[derive(Debug)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success page into a [`ScrapeError::Status`].
    pub fn error_for_status(self, url: &str) -> Result<Page> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ScrapeError::Status {
                status: self.status,
                url: url.to_string(),
            })
        }
    }
}

/// Issue a single GET and read the whole body.
///
/// A non-success status is *not* an error here: the caller decides whether it
/// is fatal (Kompas TV) or a per-page warning (CNN Indonesia).
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - Absolute URL to fetch
/// * `headers` - Extra request headers as `(name, value)` pairs
#[instrument(level = "info", skip(client, headers))]
pub async fn get_page(client: &Client, url: &str, headers: &[(&str, &str)]) -> Result<Page> {
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    debug!(status, bytes = body.len(), "GET completed");

    Ok(Page { status, body })
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::HeaderMap, http::StatusCode, routing::get};

    #[tokio::test]
    async fn test_get_page_returns_status_and_body() {
        let app = Router::new()
            .route("/ok", get(|| async { "halo" }))
            .route(
                "/down",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "rusak") }),
            );
        let base = test_support::spawn(app).await;
        let client = Client::new();

        let page = get_page(&client, &format!("{base}/ok"), &[]).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "halo");
        assert!(page.is_success());

        let page = get_page(&client, &format!("{base}/down"), &[]).await.unwrap();
        assert_eq!(page.status, 500);
        assert!(!page.is_success());
        let err = page.error_for_status("/down").unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_get_page_sends_headers() {
        let app = Router::new().route(
            "/ua",
            get(|headers: HeaderMap| async move {
                headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        );
        let base = test_support::spawn(app).await;

        let page = get_page(
            &Client::new(),
            &format!("{base}/ua"),
            &[("User-Agent", "Mozilla/5.0 test")],
        )
        .await
        .unwrap();
        assert_eq!(page.body, "Mozilla/5.0 test");
    }

    #[tokio::test]
    async fn test_get_page_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = get_page(&Client::new(), &format!("http://{addr}/"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Transport(_)));
    }
}
