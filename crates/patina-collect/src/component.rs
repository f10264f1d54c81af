//! Component aggregation.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde_yaml::Value;

use patina_scrape::{RawRecord, Strategy};

use crate::{markdown, CollectError, DescriptionFilter, Diagnostic};

/// Fields consumed by the mapping step; everything else flows through
/// into [`Component::extra`] unmodified.
const MAPPED_FIELDS: &[&str] = &["name", "category", "description", "template"];

/// A documented component.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Component {
    /// Component name, unique within its category.
    pub name: String,

    /// Grouping key for the generated site.
    pub category: String,

    /// Rendered HTML description.
    pub description: String,

    /// Output path relative to the destination root.
    pub path: String,

    /// Per-component template override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Author-supplied extension fields, carried through unmodified.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Component {
    /// Shallow-merge `other` onto this component.
    ///
    /// Incoming values win; extension fields absent from `other` are
    /// preserved.
    fn merge(&mut self, other: Component) {
        self.description = other.description;
        self.path = other.path;

        if other.template.is_some() {
            self.template = other.template;
        }

        self.extra.extend(other.extra);
    }
}

/// Category-keyed collection of components.
///
/// The collection is owned, mutable state scoped to one instance:
/// repeated [`scrape`](Self::scrape) calls accumulate into the same map
/// rather than replacing it, with same-name records merging instead of
/// duplicating. Buckets stay sorted by component name.
pub struct ComponentsCollection {
    strategy: Strategy,
    components: BTreeMap<String, Vec<Component>>,
    diagnostics: Vec<Diagnostic>,
}

impl ComponentsCollection {
    /// Create an empty collection scraping with the given strategy.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            components: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Scrape the given files and fold the results into the collection.
    ///
    /// Records missing `name` or `category` are dropped with a
    /// diagnostic. Scraper and description-file errors are fatal.
    pub fn scrape(
        &mut self,
        files: &[PathBuf],
        filter: &dyn DescriptionFilter,
    ) -> Result<&BTreeMap<String, Vec<Component>>, CollectError> {
        let records = patina_scrape::scrape_files(files, &self.strategy)?;

        let mut mapped = Vec::new();
        for record in records {
            if record.name().is_none() || record.category().is_none() {
                self.reject(&record.file, "missing `name` or `category`");
                continue;
            }

            mapped.push(map_record(&record, filter)?);
        }

        mapped.sort_by(|a, b| a.category.cmp(&b.category));

        for component in mapped {
            self.add(component);
        }

        Ok(&self.components)
    }

    /// The aggregated category map.
    pub fn components(&self) -> &BTreeMap<String, Vec<Component>> {
        &self.components
    }

    /// Records dropped by validation since the collection was created.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Total number of components across all categories.
    pub fn len(&self) -> usize {
        self.components.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Add a component, merging when its (category, name) pair already
    /// exists. The bucket stays name-sorted.
    fn add(&mut self, component: Component) {
        let bucket = self.components.entry(component.category.clone()).or_default();

        match bucket.binary_search_by(|existing| existing.name.cmp(&component.name)) {
            Ok(index) => bucket[index].merge(component),
            Err(index) => bucket.insert(index, component),
        }
    }

    fn reject(&mut self, file: &str, reason: &str) {
        tracing::warn!("Skipping documentation block in {}: {}", file, reason);
        self.diagnostics.push(Diagnostic {
            file: file.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Map a validated record into a component.
///
/// The description resolves to a file next to the record's source when
/// one exists, and to the literal text otherwise; both pass through the
/// filter before Markdown rendering.
fn map_record(
    record: &RawRecord,
    filter: &dyn DescriptionFilter,
) -> Result<Component, CollectError> {
    let name = record.name().unwrap_or_default().to_string();
    let category = record.category().unwrap_or_default().to_string();

    let description = match record.description() {
        Some(text) => {
            let source = record.dir.join(text);
            let raw = if source.is_file() {
                fs::read_to_string(&source).map_err(|e| CollectError::Description {
                    path: source.display().to_string(),
                    message: e.to_string(),
                })?
            } else {
                text.to_string()
            };

            let expanded = filter.apply(&raw).map_err(|message| CollectError::Filter {
                file: record.file.clone(),
                message,
            })?;

            markdown::render(&expanded)
        }
        None => String::new(),
    };

    let path = match record.str_field("filename") {
        Some(filename) => format!("{}/{}", category, filename),
        None => format!("{}/{}.html", category, name),
    };

    let template = record.str_field("template").map(str::to_string);

    let mut extra: BTreeMap<String, Value> = record
        .fields
        .iter()
        .filter_map(|(key, value)| match key.as_str() {
            Some(key) if !MAPPED_FIELDS.contains(&key) => Some((key.to_string(), value.clone())),
            _ => None,
        })
        .collect();

    extra.insert("_file".to_string(), Value::from(record.file.clone()));
    extra.insert("_path".to_string(), Value::from(record.dir_display()));

    Ok(Component {
        name,
        category,
        description,
        path,
        template,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::tempdir;

    use crate::NoFilter;

    fn collection() -> ComponentsCollection {
        ComponentsCollection::new(Strategy::Delimited {
            open: "{#".to_string(),
            close: "#}".to_string(),
        })
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn drops_records_missing_name_or_category() {
        let temp = tempdir().unwrap();
        let src = write(
            temp.path(),
            "partial.css",
            "{#\nname: Orphan\n#}\n{#\ncategory: content\n#}\n{#\nname: Kept\ncategory: content\n#}",
        );

        let mut collection = collection();
        collection.scrape(&[src], &NoFilter).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.diagnostics().len(), 2);
        assert_eq!(collection.diagnostics()[0].file, "partial.css");
    }

    #[test]
    fn merge_is_idempotent_across_scrapes() {
        let temp = tempdir().unwrap();
        let src = write(
            temp.path(),
            "button.css",
            "{#\nname: Button\ncategory: content\ndescription: A button\n#}",
        );

        let mut collection = collection();
        collection.scrape(&[src.clone()], &NoFilter).unwrap();
        collection.scrape(&[src], &NoFilter).unwrap();

        let bucket = &collection.components()["content"];
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].name, "Button");
        assert!(bucket[0].description.contains("A button"));
    }

    #[test]
    fn merge_overwrites_matching_fields_and_preserves_missing_ones() {
        let temp = tempdir().unwrap();
        let first = write(
            temp.path(),
            "one.css",
            "{#\nname: Button\ncategory: content\ndescription: old\nvariant: primary\n#}",
        );
        let second = write(
            temp.path(),
            "two.css",
            "{#\nname: Button\ncategory: content\ndescription: new\n#}",
        );

        let mut collection = collection();
        collection.scrape(&[first, second], &NoFilter).unwrap();

        let bucket = &collection.components()["content"];
        assert_eq!(bucket.len(), 1);
        assert!(bucket[0].description.contains("new"));
        assert_eq!(
            bucket[0].extra.get("variant").and_then(|v| v.as_str()),
            Some("primary")
        );
    }

    #[test]
    fn sorts_categories_and_names() {
        let temp = tempdir().unwrap();
        let src = write(
            temp.path(),
            "mixed.css",
            concat!(
                "{#\nname: y\ncategory: b\n#}\n",
                "{#\nname: x\ncategory: a\n#}\n",
                "{#\nname: x\ncategory: b\n#}\n",
            ),
        );

        let mut collection = collection();
        collection.scrape(&[src], &NoFilter).unwrap();

        let categories: Vec<&String> = collection.components().keys().collect();
        assert_eq!(categories, vec!["a", "b"]);

        let names: Vec<&str> = collection.components()["b"]
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn description_file_and_literal_render_the_same_heading() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("body.md"), "# Title").unwrap();
        let src = write(
            temp.path(),
            "widgets.css",
            concat!(
                "{#\nname: FromFile\ncategory: content\ndescription: ./body.md\n#}\n",
                "{#\nname: FromText\ncategory: content\ndescription: '# Title'\n#}\n",
            ),
        );

        let mut collection = collection();
        collection.scrape(&[src], &NoFilter).unwrap();

        let bucket = &collection.components()["content"];
        assert!(bucket[0].description.contains("<h1>Title</h1>"));
        assert!(bucket[1].description.contains("<h1>Title</h1>"));
    }

    #[test]
    fn computes_output_path_from_name_or_filename() {
        let temp = tempdir().unwrap();
        let src = write(
            temp.path(),
            "paths.css",
            concat!(
                "{#\nname: Button\ncategory: content\n#}\n",
                "{#\nname: Alert\ncategory: content\nfilename: alerts.html\n#}\n",
            ),
        );

        let mut collection = collection();
        collection.scrape(&[src], &NoFilter).unwrap();

        let bucket = &collection.components()["content"];
        assert_eq!(bucket[0].path, "content/alerts.html");
        assert_eq!(bucket[1].path, "content/Button.html");
    }

    #[test]
    fn carries_extra_fields_and_source_location() {
        let temp = tempdir().unwrap();
        let src = write(
            temp.path(),
            "tagged.css",
            "{#\nname: Button\ncategory: content\nstate: stable\n#}",
        );

        let mut collection = collection();
        collection.scrape(&[src], &NoFilter).unwrap();

        let component = &collection.components()["content"][0];
        assert_eq!(
            component.extra.get("state").and_then(|v| v.as_str()),
            Some("stable")
        );
        assert_eq!(
            component.extra.get("_file").and_then(|v| v.as_str()),
            Some("tagged.css")
        );
        assert!(component
            .extra
            .get("_path")
            .and_then(|v| v.as_str())
            .unwrap()
            .ends_with(std::path::MAIN_SEPARATOR));
    }

    #[test]
    fn end_to_end_category_is_alphabetical() {
        let temp = tempdir().unwrap();
        let button = write(
            temp.path(),
            "button.css",
            "{#\nname: Button\ncategory: content\n#}",
        );
        let alert = write(
            temp.path(),
            "alert.css",
            "{#\nname: Alert\ncategory: content\n#}",
        );

        let mut collection = collection();
        collection.scrape(&[button, alert], &NoFilter).unwrap();

        let bucket = &collection.components()["content"];
        let names: Vec<&str> = bucket.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alert", "Button"]);
        assert_eq!(bucket[0].path, "content/Alert.html");
        assert_eq!(bucket[1].path, "content/Button.html");
    }
}
