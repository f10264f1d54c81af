//! Template engine for rendering style guide pages.

use std::fs;
use std::path::PathBuf;

use minijinja::{AutoEscape, Environment};

use patina_collect::DescriptionFilter;

/// Template engine backed by minijinja.
///
/// Templates are looked up by name across an ordered list of search
/// directories, the style guide source directory first. Auto-escaping is
/// disabled: component descriptions are already rendered HTML by the
/// time templates see them.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine searching the given directories in order.
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        let mut env = Environment::new();

        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_loader(move |name| {
            if name.contains("..") {
                return Ok(None);
            }

            for dir in &search_paths {
                let candidate = dir.join(name);
                if !candidate.is_file() {
                    continue;
                }

                return fs::read_to_string(&candidate).map(Some).map_err(|e| {
                    minijinja::Error::new(
                        minijinja::ErrorKind::InvalidOperation,
                        format!("failed to read template {}: {}", candidate.display(), e),
                    )
                });
            }

            Ok(None)
        });

        Self { env }
    }

    /// Render the named template with the given context.
    pub fn render<S: serde::Serialize>(
        &self,
        name: &str,
        context: S,
    ) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(name)?;

        template.render(context)
    }

    /// Render a raw template string against the same environment.
    pub fn expand_str<S: serde::Serialize>(
        &self,
        source: &str,
        context: S,
    ) -> Result<String, minijinja::Error> {
        self.env.render_str(source, context)
    }
}

impl DescriptionFilter for TemplateEngine {
    fn apply(&self, source: &str) -> Result<String, String> {
        self.expand_str(source, minijinja::context! {})
            .map_err(|e| e.to_string())
    }
}
