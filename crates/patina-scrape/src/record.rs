//! Untyped documentation records.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

/// One scraped documentation block, tagged with its source location.
///
/// Records are transient: aggregators consume them immediately and fold
/// the fields into typed components or views.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Basename of the file the block was scraped from.
    pub file: String,

    /// Directory containing the file.
    pub dir: PathBuf,

    /// Author-declared key/values, exactly as parsed.
    pub fields: Mapping,
}

impl RawRecord {
    /// Create a record for a block scraped from `src`.
    pub fn new(src: &Path, fields: Mapping) -> Self {
        let file = src
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let dir = src.parent().unwrap_or_else(|| Path::new("")).to_path_buf();

        Self { file, dir, fields }
    }

    /// Look up a string-valued field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The component name declared by the block, if any.
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// The category declared by the block, if any.
    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    /// The description declared by the block, if any.
    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// The directory containing the source file, with a trailing
    /// separator, as exposed to templates.
    pub fn dir_display(&self) -> String {
        format!("{}{}", self.dir.display(), std::path::MAIN_SEPARATOR)
    }
}
