//! Delimited documentation block extraction.

use std::path::Path;

use serde_yaml::Mapping;

use crate::ScrapeError;

/// Extract and parse every delimited block in `content`.
pub fn scrape(
    content: &str,
    open: &str,
    close: &str,
    path: &Path,
) -> Result<Vec<Mapping>, ScrapeError> {
    extract_blocks(content, open, close)
        .into_iter()
        .map(|block| crate::parse_mapping(block, path))
        .collect()
}

/// Return the interior of every non-overlapping `open .. close` span.
///
/// A span runs from an open delimiter to the nearest following close
/// delimiter with no delimiter of either kind in between. When another
/// open delimiter appears first, the scan restarts at the inner open, so
/// nesting never produces an outer block. Unterminated opens and empty
/// interiors match nothing.
pub fn extract_blocks<'a>(content: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let mut blocks = Vec::new();

    if open.is_empty() || close.is_empty() {
        return blocks;
    }

    let mut pos = 0;
    while let Some(found) = content[pos..].find(open) {
        let interior_start = pos + found + open.len();
        let rest = &content[interior_start..];

        let next_open = rest.find(open);
        let next_close = rest.find(close);

        match (next_open, next_close) {
            (_, None) => break,
            (Some(o), Some(c)) if o < c => {
                pos = interior_start + o;
            }
            (_, Some(c)) => {
                if c > 0 {
                    blocks.push(&rest[..c]);
                }
                pos = interior_start + c + close.len();
            }
        }
    }

    blocks
}
