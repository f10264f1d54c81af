//! View aggregation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use walkdir::WalkDir;

use patina_scrape::{RawRecord, Strategy};

use crate::{CollectError, Diagnostic};

/// A standalone page rendered through its own template.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct View {
    /// Resolved source file path.
    #[serde(rename = "_src")]
    pub src: PathBuf,

    /// Computed output file path.
    pub dest: PathBuf,

    /// Path relative to the source root; doubles as the template
    /// identifier.
    pub path: String,

    /// Display name, derived from the file stem unless overridden.
    pub name: String,

    /// Scraped extension fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl View {
    /// Merge scraped metadata over the computed defaults.
    ///
    /// User-declared `name` and `dest` win; everything else lands in
    /// `extra`.
    fn apply(&mut self, record: RawRecord) {
        for (key, value) in record.fields {
            match key.as_str() {
                Some("name") => {
                    if let Some(name) = value.as_str() {
                        self.name = name.to_string();
                    }
                }
                Some("dest") => {
                    if let Some(dest) = value.as_str() {
                        self.dest = PathBuf::from(dest);
                    }
                }
                Some(key) => {
                    self.extra.insert(key.to_string(), value);
                }
                None => {}
            }
        }
    }
}

/// Name-ordered collection of views.
///
/// Like the component collection, this is owned state scoped to one
/// instance: repeated [`collect`](Self::collect) calls accumulate, and
/// the sequence stays name-sorted after every insertion.
pub struct ViewsCollection {
    src_root: PathBuf,
    dest_root: PathBuf,
    strategy: Strategy,
    views: Vec<View>,
    diagnostics: Vec<Diagnostic>,
}

impl ViewsCollection {
    /// Create an empty collection rooted at the given source and
    /// destination directories.
    pub fn new(src_root: PathBuf, dest_root: PathBuf, strategy: Strategy) -> Self {
        Self {
            src_root,
            dest_root,
            strategy,
            views: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Discover every file under `views_dir` (relative to the source
    /// root) and fold it into the collection.
    ///
    /// A missing views directory or destination root is a normal empty
    /// result, not an error.
    pub fn collect(&mut self, views_dir: &str) -> Result<&[View], CollectError> {
        let source = self.src_root.join(views_dir);

        if !source.is_dir() || !self.dest_root.is_dir() {
            return Ok(&self.views);
        }

        for entry in WalkDir::new(&source).follow_links(true) {
            let entry = entry.map_err(|e| CollectError::Walk {
                path: source.display().to_string(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let file = entry.path();
            let mut view = self.view_defaults(file, &source, views_dir);

            for record in patina_scrape::scrape_file(file, &self.strategy)? {
                view.apply(record);
            }

            if view.name.is_empty() {
                self.reject(file, "missing `name`");
                continue;
            }

            self.insert(view);
        }

        Ok(&self.views)
    }

    /// The aggregated, name-sorted view sequence.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Records dropped by validation since the collection was created.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Compute the default view entry for a discovered file.
    fn view_defaults(&self, file: &Path, views_root: &Path, views_dir: &str) -> View {
        let relative_to_views = file.strip_prefix(views_root).unwrap_or(file);
        let relative_to_src = file.strip_prefix(&self.src_root).unwrap_or(file);

        View {
            src: file.to_path_buf(),
            dest: self.dest_root.join(views_dir).join(relative_to_views),
            path: template_name(relative_to_src),
            name: file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
            extra: BTreeMap::new(),
        }
    }

    /// Insert keeping the sequence sorted by name; equal names keep
    /// insertion order.
    fn insert(&mut self, view: View) {
        let index = self
            .views
            .partition_point(|existing| existing.name.as_str() <= view.name.as_str());
        self.views.insert(index, view);
    }

    fn reject(&mut self, file: &Path, reason: &str) {
        let file = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        tracing::warn!("Skipping view {}: {}", file, reason);
        self.diagnostics.push(Diagnostic {
            file,
            reason: reason.to_string(),
        });
    }
}

/// Turn a relative path into a `/`-separated template identifier.
fn template_name(path: &Path) -> String {
    path.iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn delimiters() -> Strategy {
        Strategy::Delimited {
            open: "{#".to_string(),
            close: "#}".to_string(),
        }
    }

    fn roots() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let dest = temp.path().join("dest");
        fs::create_dir_all(src.join("views")).unwrap();
        fs::create_dir_all(&dest).unwrap();
        (temp, src, dest)
    }

    #[test]
    fn missing_views_directory_is_empty_not_an_error() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        let dest = temp.path().join("dest");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();

        let mut views = ViewsCollection::new(src, dest, delimiters());

        assert!(views.collect("views").unwrap().is_empty());
    }

    #[test]
    fn missing_destination_root_is_empty_not_an_error() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("views")).unwrap();
        fs::write(src.join("views/about.html"), "<h1>About</h1>").unwrap();

        let mut views =
            ViewsCollection::new(src, temp.path().join("never-created"), delimiters());

        assert!(views.collect("views").unwrap().is_empty());
    }

    #[test]
    fn computes_dest_path_and_name_defaults() {
        let (_temp, src, dest) = roots();
        fs::create_dir_all(src.join("views/guides")).unwrap();
        fs::write(src.join("views/guides/colors.html"), "<p>Colors</p>").unwrap();

        let mut views = ViewsCollection::new(src.clone(), dest.clone(), delimiters());
        views.collect("views").unwrap();

        let view = &views.views()[0];
        assert_eq!(view.name, "colors");
        assert_eq!(view.path, "views/guides/colors.html");
        assert_eq!(view.dest, dest.join("views").join("guides/colors.html"));
        assert_eq!(view.src, src.join("views/guides/colors.html"));
    }

    #[test]
    fn scraped_metadata_overrides_defaults() {
        let (_temp, src, dest) = roots();
        fs::write(
            src.join("views/about.html"),
            "{#\nname: About Us\naudience: public\n#}\n<h1>About</h1>",
        )
        .unwrap();

        let mut views = ViewsCollection::new(src, dest, delimiters());
        views.collect("views").unwrap();

        let view = &views.views()[0];
        assert_eq!(view.name, "About Us");
        assert_eq!(
            view.extra.get("audience").and_then(|v| v.as_str()),
            Some("public")
        );
    }

    #[test]
    fn views_stay_sorted_by_name() {
        let (_temp, src, dest) = roots();
        fs::write(src.join("views/zebra.html"), "z").unwrap();
        fs::write(src.join("views/apple.html"), "a").unwrap();
        fs::write(src.join("views/mango.html"), "m").unwrap();

        let mut views = ViewsCollection::new(src, dest, delimiters());
        views.collect("views").unwrap();

        let names: Vec<&str> = views.views().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn empty_name_override_drops_the_view() {
        let (_temp, src, dest) = roots();
        fs::write(src.join("views/unnamed.html"), "{#\nname: ''\n#}").unwrap();

        let mut views = ViewsCollection::new(src, dest, delimiters());
        views.collect("views").unwrap();

        assert!(views.views().is_empty());
        assert_eq!(views.diagnostics().len(), 1);
        assert_eq!(views.diagnostics()[0].file, "unnamed.html");
    }
}
