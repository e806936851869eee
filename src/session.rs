//! Interactive session state.
//!
//! The form is driven by one explicit [`Session`] value that the web layer
//! owns and passes around; nothing about the current selection lives in
//! globals. Transitions:
//!
//! ```text
//! Idle ─select_source─▶ ParametersEntered ─begin_fetch─▶ Fetching ─complete─┬─▶ ResultsShown
//!                              │                                            └─▶ Error (empty table)
//!                              └─begin_fetch (invalid params)─▶ Error
//! ```
//!
//! `ResultsShown` and `Error` both accept `select_source` and `begin_fetch`
//! again. Nothing leaves `Fetching` except `complete`.

use crate::error::ScrapeError;
use crate::models::{FetchOutcome, FetchParams, Notice, ResultTable, Source};
use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::debug;

pub const NO_DATA: &str = "Tidak ada data yang berhasil diambil.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    ParametersEntered,
    Fetching,
    ResultsShown,
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: UiState,
    },

    /// Parameters failed validation; the session is now in `Error`.
    #[error("{0}")]
    Rejected(String),

    #[error("nothing to export")]
    NothingToExport,
}

/// A successful fetch kept around for rendering and export.
#[derive(Debug, Clone)]
pub struct Results {
    pub source: Source,
    pub table: ResultTable,
    pub fetched_at: DateTime<Local>,
}

/// A CSV download ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub csv: Vec<u8>,
}

#[derive(Debug)]
pub struct Session {
    state: UiState,
    params: FetchParams,
    notices: Vec<Notice>,
    results: Option<Results>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: UiState::Idle,
            params: FetchParams::default(),
            notices: Vec::new(),
            results: None,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn results(&self) -> Option<&Results> {
        self.results.as_ref()
    }

    /// Pick a source and reveal its inputs. Clears previous results.
    ///
    /// Re-selecting the current source keeps whatever was typed so far.
    pub fn select_source(&mut self, source: Source) -> Result<(), SessionError> {
        self.guard_not_fetching("select a source")?;
        if source != self.params.source {
            self.params = FetchParams::for_source(source);
        }
        self.notices.clear();
        self.results = None;
        self.transition(UiState::ParametersEntered);
        Ok(())
    }

    /// Accept parameters and move to `Fetching`.
    ///
    /// Invalid parameters move the session to `Error` with a notice and
    /// return [`SessionError::Rejected`]; the caller must not fetch.
    pub fn begin_fetch(&mut self, params: FetchParams) -> Result<(), SessionError> {
        self.guard_not_fetching("start a fetch")?;
        let validation = params.validate();
        self.params = params;
        self.notices.clear();
        self.results = None;

        if let Err(e) = validation {
            return Err(self.reject(e));
        }

        self.transition(UiState::Fetching);
        Ok(())
    }

    /// Refuse the submitted input without fetching: show `error` and move to
    /// `Error`. Used for input that cannot even be turned into parameters.
    pub fn reject(&mut self, error: ScrapeError) -> SessionError {
        let message = match error {
            ScrapeError::Validation(message) => message,
            other => other.to_string(),
        };
        self.notices.clear();
        self.results = None;
        self.notices.push(Notice::error(message.clone()));
        self.transition(UiState::Error);
        SessionError::Rejected(message)
    }

    /// Record the outcome of the fetch started by [`begin_fetch`](Self::begin_fetch).
    pub fn complete(&mut self, outcome: FetchOutcome) -> Result<(), SessionError> {
        if self.state != UiState::Fetching {
            return Err(SessionError::InvalidTransition {
                action: "complete a fetch",
                state: self.state,
            });
        }

        let source = self.params.source;
        self.notices = outcome.notices;
        if outcome.table.is_empty() {
            self.notices.push(Notice::error(NO_DATA));
            self.transition(UiState::Error);
        } else {
            self.notices.push(Notice::success(format!(
                "Berhasil mengambil {} data dari {}",
                outcome.table.len(),
                source
            )));
            self.results = Some(Results {
                source,
                table: outcome.table,
                fetched_at: Local::now(),
            });
            self.transition(UiState::ResultsShown);
        }
        Ok(())
    }

    /// CSV of the results currently shown.
    pub fn export(&self) -> Result<Export, SessionError> {
        let results = match (&self.state, &self.results) {
            (UiState::ResultsShown, Some(results)) => results,
            _ => return Err(SessionError::NothingToExport),
        };
        let csv = results
            .table
            .to_csv()
            .map_err(|e| SessionError::Rejected(e.to_string()))?;
        Ok(Export {
            filename: results.source.export_filename(),
            csv,
        })
    }

    fn guard_not_fetching(&self, action: &'static str) -> Result<(), SessionError> {
        if self.state == UiState::Fetching {
            Err(SessionError::InvalidTransition {
                action,
                state: self.state,
            })
        } else {
            Ok(())
        }
    }

    fn transition(&mut self, to: UiState) {
        debug!(from = ?self.state, ?to, "Session transition");
        self.state = to;
    }
}
