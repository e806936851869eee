//! Source-specific fetchers.
//!
//! Each submodule turns one upstream into a [`FetchOutcome`](crate::models::FetchOutcome):
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Kompas TV | [`kompas`] | HTML fragment in JSON | Single request |
//! | CNN Indonesia | [`cnn`] | HTML scraping | Paginated, browser User-Agent, per-page failures skipped |
//! | Instagram Comments | [`instagram`] | Hosted actor | Requires an API token |
//!
//! # Common Patterns
//!
//! - Selectors and endpoints live as named constants at the top of each module
//! - Fetch functions never return `Err`: failures become notices and the table
//!   comes back empty (or partial, for CNN)
//! - Parsing is split from fetching so markup changes can be tested offline

pub mod cnn;
pub mod instagram;
pub mod kompas;
