//! Documentation scraper for patina.
//!
//! Extracts YAML documentation blocks from source files, either from
//! delimited comment spans or from front matter, and returns them as
//! untyped records tagged with their source location.

pub mod delimited;
pub mod frontmatter;
pub mod record;

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

pub use record::RawRecord;

/// How documentation blocks are located within a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// YAML spans bounded by an open/close delimiter pair, typically
    /// hidden inside the host language's comment syntax.
    Delimited { open: String, close: String },

    /// YAML front matter. A document-level header contributes the file
    /// body as the record's description; otherwise `---` blocks anywhere
    /// in the file are parsed independently.
    FrontMatter,
}

/// Errors that can occur while scraping.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid YAML in {path}: {message}")]
    Yaml { path: String, message: String },

    #[error("Documentation block in {path} is not a YAML mapping")]
    NotAMapping { path: String },

    #[error("Unclosed front matter in {path} - missing closing ---")]
    UnclosedFrontMatter { path: String },
}

/// Scrape every file in the list, in order.
///
/// Paths that are not regular files are skipped without error, so callers
/// can pass glob expansions that include directories. Read failures and
/// malformed YAML are fatal and abort the whole scrape.
pub fn scrape_files(files: &[PathBuf], strategy: &Strategy) -> Result<Vec<RawRecord>, ScrapeError> {
    let mut records = Vec::new();

    for path in files {
        if !path.is_file() {
            continue;
        }

        records.extend(scrape_file(path, strategy)?);
    }

    Ok(records)
}

/// Scrape a single file.
///
/// Returns one record per documentation block found; a file may contain
/// any number of blocks, including none.
pub fn scrape_file(path: &Path, strategy: &Strategy) -> Result<Vec<RawRecord>, ScrapeError> {
    let content = fs::read_to_string(path).map_err(|e| ScrapeError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mappings = match strategy {
        Strategy::Delimited { open, close } => delimited::scrape(&content, open, close, path)?,
        Strategy::FrontMatter => frontmatter::scrape(&content, path)?,
    };

    Ok(mappings
        .into_iter()
        .map(|fields| RawRecord::new(path, fields))
        .collect())
}

/// Parse one block interior as a YAML mapping.
pub(crate) fn parse_mapping(text: &str, path: &Path) -> Result<Mapping, ScrapeError> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| ScrapeError::Yaml {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ScrapeError::NotAMapping {
            path: path.display().to_string(),
        }),
    }
}
