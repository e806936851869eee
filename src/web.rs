//! Browser form served over HTTP.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | Render the form; `?source=` picks a source |
//! | `POST /scrape` | Validate, fetch (blocking until done) and render results |
//! | `GET /export` | Download the shown results as CSV |
//! | `GET /healthz` | Liveness probe |
//!
//! The single [`Session`] sits behind an async mutex so only one fetch is ever
//! in flight; a second submit waits for the first to finish.

use crate::dispatch::Scraper;
use crate::error::ScrapeError;
use crate::models::{FetchParams, LIMIT_DEFAULT, PAGES_DEFAULT, Source};
use crate::session::{Session, SessionError};
use crate::templates::render_page;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub struct AppState {
    pub scraper: Scraper,
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(scraper: Scraper) -> Arc<Self> {
        Arc::new(Self {
            scraper,
            session: Mutex::new(Session::new()),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/scrape", post(scrape))
        .route("/export", get(export_csv))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Bind and serve until the process is stopped.
pub async fn serve(host: &str, port: u16, scraper: Scraper) -> std::io::Result<()> {
    let app = router(AppState::new(scraper));
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Scraper form listening on http://{addr}");
    axum::serve(listener, app).await
}

#[derive(Debug, Deserialize)]
struct PickQuery {
    source: Option<String>,
}

async fn form_page(State(state): State<Arc<AppState>>, Query(q): Query<PickQuery>) -> Response {
    let mut session = state.session.lock().await;
    if let Some(source) = q.source.as_deref().and_then(Source::from_slug) {
        if let Err(e) = session.select_source(source) {
            warn!(error = %e, "Ignoring source change");
        }
    }
    Html(render_page(&session)).into_response()
}

/// Raw form fields; numbers arrive as text and are parsed leniently.
#[derive(Debug, Deserialize)]
struct ScrapeForm {
    source: Source,
    pages: Option<String>,
    limit: Option<String>,
    post_url: Option<String>,
}

impl ScrapeForm {
    fn into_params(self) -> Result<FetchParams, ScrapeError> {
        Ok(FetchParams {
            source: self.source,
            pages: parse_number(self.pages.as_deref(), PAGES_DEFAULT, "pages")?,
            limit: parse_number(self.limit.as_deref(), LIMIT_DEFAULT, "limit")?,
            post_url: self.post_url.unwrap_or_default(),
        })
    }
}

fn parse_number(raw: Option<&str>, default: u32, field: &str) -> Result<u32, ScrapeError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text
            .parse()
            .map_err(|_| ScrapeError::Validation(format!("Nilai {field} tidak valid: {text}"))),
    }
}

async fn scrape(State(state): State<Arc<AppState>>, Form(form): Form<ScrapeForm>) -> Response {
    // Spawned so a client disconnect cannot leave the session stuck in Fetching.
    let task = tokio::spawn(async move {
        let mut session = state.session.lock().await;
        let params = match form.into_params() {
            Ok(params) => params,
            Err(e) => {
                warn!(error = %e, "Unparseable form input");
                session.reject(e);
                return render_page(&session);
            }
        };

        match session.begin_fetch(params.clone()) {
            Ok(()) => {
                let outcome = state.scraper.fetch(&params).await;
                if let Err(e) = session.complete(outcome) {
                    error!(error = %e, "Session rejected fetch outcome");
                }
            }
            Err(SessionError::Rejected(message)) => {
                info!(%message, "Fetch rejected by validation");
            }
            Err(e) => warn!(error = %e, "Fetch not started"),
        }
        info!(state = ?session.state(), "Scrape handled");
        render_page(&session)
    });

    match task.await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Scrape task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Scrape failed").into_response()
        }
    }
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let session = state.session.lock().await;
    match session.export() {
        Ok(export) => {
            let disposition = format!("attachment; filename=\"{}\"", export.filename);
            let disposition = HeaderValue::from_str(&disposition)
                .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
            (
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("text/csv; charset=utf-8"),
                    ),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.csv,
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Export requested without results");
            (StatusCode::NOT_FOUND, "Tidak ada data untuk diekspor.").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::http::test_support;
    use crate::models::MISSING_POST_URL;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app_with(settings: Settings) -> Router {
        router(AppState::new(Scraper::from_settings(settings)))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scrape")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_kompas_scrape_then_export() {
        let stub = Router::new().route(
            "/kompas",
            get(|| async {
                r#"{"html":"<h2 class=\"title-news\"><a href=\"/1\">Judul Satu</a></h2><h2 class=\"title-news\"><a href=\"/2\">Judul Dua</a></h2>"}"#
            }),
        );
        let base = test_support::spawn(stub).await;
        let app = app_with(Settings {
            kompas_url: format!("{base}/kompas"),
            ..Settings::default()
        });

        let (status, _, html) = send(&app, post_form("source=kompas-tv")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Berhasil mengambil 2 data dari Kompas TV"));
        assert!(html.contains("<td>Judul Satu</td>"));

        let (status, headers, csv) = send(&app, get_req("/export")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"kompas_tv_data.csv\""
        );
        assert_eq!(csv, "judul\nJudul Satu\nJudul Dua\n");
    }

    #[tokio::test]
    async fn test_instagram_without_url_is_rejected() {
        let app = app_with(Settings::default());

        let (status, _, html) = send(
            &app,
            post_form("source=instagram-comments&post_url=&limit=15"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(MISSING_POST_URL));
        assert!(html.contains(r#"name="post_url""#));

        let (status, _, body) = send(&app, get_req("/export")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Tidak ada data untuk diekspor.");
    }

    #[tokio::test]
    async fn test_unparseable_pages_reported() {
        let app = app_with(Settings::default());
        let (status, _, html) = send(&app, post_form("source=cnn-indonesia&pages=abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Nilai pages tidak valid: abc"));
    }

    #[tokio::test]
    async fn test_picker_reveals_cnn_slider() {
        let app = app_with(Settings::default());
        let (status, _, html) = send(&app, get_req("/?source=cnn-indonesia")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"name="pages" min="1" max="10" value="3""#));

        // Unknown slugs leave the selection alone.
        let (_, _, html) = send(&app, get_req("/?source=twitter")).await;
        assert!(html.contains(r#"value="cnn-indonesia" onchange="this.form.submit()" checked"#));
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = app_with(Settings::default());
        let (status, _, body) = send(&app, get_req("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
