//! Data models for fetched records and the parameters that drive a fetch.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Source`]: The three fixed data sources a user can pick from
//! - [`Headline`] / [`Comment`]: Flat records produced by one extraction
//! - [`ResultTable`]: The ordered, homogeneous collection returned by one fetch
//! - [`Notice`] / [`FetchOutcome`]: What a fetch reports back to the user
//! - [`FetchParams`]: The validated inputs for a fetch
//!
//! Records are immutable once built and keep source order. There is no
//! deduplication anywhere: two identical headlines on two pages are two rows.

use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed page counts for CNN Indonesia.
pub const PAGES_MIN: u32 = 1;
pub const PAGES_MAX: u32 = 10;
pub const PAGES_DEFAULT: u32 = 3;

/// Allowed result limits for Instagram comments.
pub const LIMIT_MIN: u32 = 5;
pub const LIMIT_MAX: u32 = 100;
pub const LIMIT_DEFAULT: u32 = 15;

pub const MISSING_POST_URL: &str = "Harap masukkan URL postingan Instagram terlebih dahulu.";

/// A data source selectable in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    #[default]
    KompasTv,
    CnnIndonesia,
    InstagramComments,
}

impl Source {
    pub const ALL: [Source; 3] = [
        Source::KompasTv,
        Source::CnnIndonesia,
        Source::InstagramComments,
    ];

    /// Human-readable name shown next to the radio button.
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::KompasTv => "Kompas TV",
            Source::CnnIndonesia => "CNN Indonesia",
            Source::InstagramComments => "Instagram Comments",
        }
    }

    /// Value used in forms and query strings.
    pub fn slug(&self) -> &'static str {
        match self {
            Source::KompasTv => "kompas-tv",
            Source::CnnIndonesia => "cnn-indonesia",
            Source::InstagramComments => "instagram-comments",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Source> {
        Source::ALL.into_iter().find(|s| s.slug() == slug)
    }

    /// Download filename for a CSV export of this source.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// assert_eq!(Source::KompasTv.export_filename(), "kompas_tv_data.csv");
    /// ```
    pub fn export_filename(&self) -> String {
        format!(
            "{}_data.csv",
            self.display_name().to_lowercase().replace(' ', "_")
        )
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single news title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    /// Trimmed, never empty.
    pub judul: String,
}

/// A single Instagram comment. Either field may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    pub text: String,
}

/// The ordered collection of records produced by one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultTable {
    Headlines(Vec<Headline>),
    Comments(Vec<Comment>),
}

impl ResultTable {
    pub fn len(&self) -> usize {
        match self {
            ResultTable::Headlines(rows) => rows.len(),
            ResultTable::Comments(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names, which double as the CSV header row.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ResultTable::Headlines(_) => &["judul"],
            ResultTable::Comments(_) => &["username", "text"],
        }
    }

    /// Row-major view of the cell values, in insertion order.
    pub fn rows(&self) -> Vec<Vec<&str>> {
        match self {
            ResultTable::Headlines(rows) => rows.iter().map(|h| vec![h.judul.as_str()]).collect(),
            ResultTable::Comments(rows) => rows
                .iter()
                .map(|c| vec![c.username.as_str(), c.text.as_str()])
                .collect(),
        }
    }

    /// Serialize to UTF-8 CSV with a header row.
    ///
    /// The header is always written, so an empty table still yields a valid
    /// one-line document.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(self.headers())?;
        for row in self.rows() {
            writer.write_record(&row)?;
        }
        writer
            .into_inner()
            .map_err(|e| ScrapeError::Parse(e.to_string()))
    }
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A message surfaced inline to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// What every fetch path hands back: a table (possibly empty) and the notices
/// raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub table: ResultTable,
    pub notices: Vec<Notice>,
}

impl FetchOutcome {
    pub fn new(table: ResultTable) -> Self {
        Self {
            table,
            notices: Vec::new(),
        }
    }

    /// An empty table of the right shape plus a single notice.
    pub fn failed(table: ResultTable, notice: Notice) -> Self {
        Self {
            table,
            notices: vec![notice],
        }
    }
}

/// Inputs for one fetch action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub source: Source,
    /// CNN Indonesia only.
    pub pages: u32,
    /// Instagram only.
    pub limit: u32,
    /// Instagram only.
    pub post_url: String,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            source: Source::default(),
            pages: PAGES_DEFAULT,
            limit: LIMIT_DEFAULT,
            post_url: String::new(),
        }
    }
}

impl FetchParams {
    pub fn for_source(source: Source) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Check the inputs the selected source actually uses.
    ///
    /// Parameters belonging to the other sources are ignored, so a stale page
    /// count never blocks an Instagram fetch.
    pub fn validate(&self) -> Result<()> {
        match self.source {
            Source::KompasTv => Ok(()),
            Source::CnnIndonesia => {
                if (PAGES_MIN..=PAGES_MAX).contains(&self.pages) {
                    Ok(())
                } else {
                    Err(ScrapeError::Validation(format!(
                        "Jumlah halaman harus antara {PAGES_MIN} dan {PAGES_MAX}."
                    )))
                }
            }
            Source::InstagramComments => {
                if self.post_url.trim().is_empty() {
                    return Err(ScrapeError::Validation(MISSING_POST_URL.to_string()));
                }
                if !(LIMIT_MIN..=LIMIT_MAX).contains(&self.limit) {
                    return Err(ScrapeError::Validation(format!(
                        "Jumlah komentar harus antara {LIMIT_MIN} dan {LIMIT_MAX}."
                    )));
                }
                Ok(())
            }
        }
    }

    /// An empty table shaped for this source.
    pub fn empty_table(&self) -> ResultTable {
        match self.source {
            Source::InstagramComments => ResultTable::Comments(Vec::new()),
            _ => ResultTable::Headlines(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headlines(titles: &[&str]) -> ResultTable {
        ResultTable::Headlines(
            titles
                .iter()
                .map(|t| Headline {
                    judul: t.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_export_filenames() {
        assert_eq!(Source::KompasTv.export_filename(), "kompas_tv_data.csv");
        assert_eq!(
            Source::CnnIndonesia.export_filename(),
            "cnn_indonesia_data.csv"
        );
        assert_eq!(
            Source::InstagramComments.export_filename(),
            "instagram_comments_data.csv"
        );
    }

    #[test]
    fn test_slug_round_trip() {
        for source in Source::ALL {
            assert_eq!(Source::from_slug(source.slug()), Some(source));
        }
        assert_eq!(Source::from_slug("detik"), None);
    }

    #[test]
    fn test_headline_csv_round_trip() {
        let table = headlines(&["Judul Satu", "Judul, dengan koma", "Kutipan \"ganda\""]);
        let bytes = table.to_csv().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(header, vec!["judul"]);

        let parsed: Vec<Headline> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(ResultTable::Headlines(parsed), table);
    }

    #[test]
    fn test_comment_csv_round_trip_keeps_empty_fields() {
        let table = ResultTable::Comments(vec![
            Comment {
                username: "budi".to_string(),
                text: "Mantap!\nbaris dua".to_string(),
            },
            Comment {
                username: String::new(),
                text: "tanpa nama".to_string(),
            },
            Comment {
                username: "siti".to_string(),
                text: String::new(),
            },
        ]);
        let bytes = table.to_csv().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(reader.headers().unwrap(), vec!["username", "text"]);
        let parsed: Vec<Comment> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(parsed.len(), 3);
        assert_eq!(ResultTable::Comments(parsed), table);
    }

    #[test]
    fn test_csv_is_utf8() {
        let table = headlines(&["Presiden menghadiri rapat — Jakarta"]);
        let bytes = table.to_csv().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "judul\nPresiden menghadiri rapat — Jakarta\n");
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let bytes = ResultTable::Comments(vec![]).to_csv().unwrap();
        assert_eq!(bytes, b"username,text\n");
    }

    #[test]
    fn test_validate_instagram_requires_url() {
        let mut params = FetchParams::for_source(Source::InstagramComments);
        params.post_url = "   ".to_string();
        let err = params.validate().unwrap_err();
        assert!(matches!(err, ScrapeError::Validation(_)));

        params.post_url = "https://www.instagram.com/p/abc/".to_string();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_ranges() {
        let mut cnn = FetchParams::for_source(Source::CnnIndonesia);
        cnn.pages = 0;
        assert!(cnn.validate().is_err());
        cnn.pages = 11;
        assert!(cnn.validate().is_err());
        cnn.pages = 10;
        assert!(cnn.validate().is_ok());

        let mut ig = FetchParams::for_source(Source::InstagramComments);
        ig.post_url = "https://www.instagram.com/p/abc/".to_string();
        ig.limit = 4;
        assert!(ig.validate().is_err());
        ig.limit = 101;
        assert!(ig.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_other_sources_inputs() {
        let mut kompas = FetchParams::for_source(Source::KompasTv);
        kompas.pages = 99;
        kompas.limit = 0;
        assert!(kompas.validate().is_ok());
    }

    #[test]
    fn test_empty_table_shape() {
        assert_eq!(
            FetchParams::for_source(Source::InstagramComments).empty_table(),
            ResultTable::Comments(vec![])
        );
        assert_eq!(
            FetchParams::for_source(Source::CnnIndonesia).empty_table(),
            ResultTable::Headlines(vec![])
        );
    }
}
