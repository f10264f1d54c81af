//! Static style guide generation.
//!
//! Orchestrates scraping, aggregation, and template rendering into a
//! navigable HTML site.

pub mod assets;
pub mod generator;
pub mod templates;

pub use generator::{expand, BuildError, BuildSummary, SiteGenerator, SiteOptions};
pub use templates::TemplateEngine;
