//! Front matter documentation extraction.

use std::path::Path;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::ScrapeError;

/// Extract and parse front matter documentation from `content`.
///
/// A document-level header produces exactly one record whose
/// `description` is the document body. Files without a leading header
/// fall back to scanning for `---` blocks anywhere in the text, each
/// parsed independently with the surrounding body ignored.
pub fn scrape(content: &str, path: &Path) -> Result<Vec<Mapping>, ScrapeError> {
    if let Some((header, body)) = split_document(content, path)? {
        let mut fields = crate::parse_mapping(header, path)?;

        let body = body.trim();
        if !body.is_empty() {
            fields.insert(Value::from("description"), Value::from(body));
        }

        return Ok(vec![fields]);
    }

    scrape_embedded(content, path)
}

/// Split a document that begins with a `---` front matter header.
///
/// Returns the header interior and the remaining body, or `None` when
/// the document does not start with front matter.
fn split_document<'a>(
    content: &'a str,
    path: &Path,
) -> Result<Option<(&'a str, &'a str)>, ScrapeError> {
    let trimmed = content.trim_start();

    if !trimmed.starts_with("---") {
        return Ok(None);
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(ScrapeError::UnclosedFrontMatter {
            path: path.display().to_string(),
        });
    };

    let header = after_open[..close_pos].trim();
    let body = &after_open[close_pos + 4..];

    Ok(Some((header, body)))
}

/// Scan for `---` delimited blocks anywhere in the text.
fn scrape_embedded(content: &str, path: &Path) -> Result<Vec<Mapping>, ScrapeError> {
    let pattern =
        Regex::new(r"(?ms)^---[ \t]*\r?$(.*?)^---[ \t]*\r?$").expect("embedded block pattern");

    pattern
        .captures_iter(content)
        .map(|captures| crate::parse_mapping(captures[1].trim(), path))
        .collect()
}
