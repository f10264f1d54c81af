//! Aggregation of scraped documentation into components and views.
//!
//! Turns the untyped records produced by `patina-scrape` into a
//! category-keyed component collection and a name-ordered view sequence,
//! collecting diagnostics for records that fail validation instead of
//! silently dropping them.

pub mod component;
pub mod markdown;
pub mod view;

pub use component::{Component, ComponentsCollection};
pub use view::{View, ViewsCollection};

use patina_scrape::ScrapeError;

/// A non-fatal record rejection.
///
/// Invalid records never abort a build; they are dropped and reported
/// through the owning collection's diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Basename of the file the record came from.
    pub file: String,

    /// Why the record was dropped.
    pub reason: String,
}

/// Expands template syntax embedded in description text before it is
/// rendered as Markdown.
///
/// The site generator implements this for its template engine so that
/// descriptions resolve against the same environment as pages; [`NoFilter`]
/// is the identity for pipelines without one.
pub trait DescriptionFilter {
    fn apply(&self, source: &str) -> Result<String, String>;
}

/// Identity description filter.
pub struct NoFilter;

impl DescriptionFilter for NoFilter {
    fn apply(&self, source: &str) -> Result<String, String> {
        Ok(source.to_string())
    }
}

/// Errors that can occur during aggregation.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("Failed to read description file {path}: {message}")]
    Description { path: String, message: String },

    #[error("Failed to expand description from {file}: {message}")]
    Filter { file: String, message: String },

    #[error("Failed to walk views directory {path}: {message}")]
    Walk { path: String, message: String },
}
