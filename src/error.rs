//! Error taxonomy shared by every fetch path.
//!
//! Library functions return `Result<T, ScrapeError>` and propagate with `?`.
//! Nothing here ever reaches the user raw: at the fetch boundary each error is
//! turned into a [`Notice`](crate::models::Notice) and the caller still gets a
//! well-formed (possibly empty) result table.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Non-success HTTP status from a news site.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Connection, TLS or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The hosted actor API answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The hosted actor run ended in a terminal non-success state.
    #[error("actor run finished with status {0}")]
    RunFailed(String),

    #[error("parse error: {0}")]
    Parse(String),

    /// Missing or out-of-range user input, caught before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// True for failures that happened on the wire (status or transport).
    pub fn is_transport(&self) -> bool {
        matches!(self, ScrapeError::Status { .. } | ScrapeError::Transport(_))
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Parse(err.to_string())
    }
}

impl From<csv::Error> for ScrapeError {
    fn from(err: csv::Error) -> Self {
        ScrapeError::Parse(err.to_string())
    }
}
