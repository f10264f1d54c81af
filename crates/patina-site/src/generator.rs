//! Style guide build orchestration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use patina_collect::{CollectError, ComponentsCollection, ViewsCollection};
use patina_scrape::Strategy;

use crate::assets;
use crate::templates::TemplateEngine;

/// Configuration for a style guide build.
#[derive(Debug, Clone)]
pub struct SiteOptions {
    /// Working source directory: templates, views, and placed assets.
    pub src: PathBuf,

    /// Destination root for the generated site.
    pub dest: PathBuf,

    /// How documentation blocks are scraped out of component files.
    pub strategy: Strategy,

    /// Template used for components without a `template` override.
    pub default_template: String,

    /// Extra directories searched for templates after `src`.
    pub template_paths: Vec<PathBuf>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            src: PathBuf::from("styleguide/src"),
            dest: PathBuf::from("styleguide/dest"),
            strategy: Strategy::Delimited {
                open: "{#".to_string(),
                close: "#}".to_string(),
            },
            default_template: "templates/component.html".to_string(),
            template_paths: vec![],
        }
    }
}

/// Result of a build.
#[derive(Debug)]
pub struct BuildSummary {
    /// Number of aggregated components.
    pub components: usize,

    /// Number of aggregated views.
    pub views: usize,

    /// Number of pages written, index included.
    pub pages: usize,

    /// Number of records dropped by validation.
    pub skipped: usize,

    /// Total build time in milliseconds.
    pub duration_ms: u64,

    /// Destination root.
    pub dest: PathBuf,
}

/// Errors that can occur during a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to place default assets in {path}: {message}")]
    Place { path: String, message: String },

    #[error("Failed to expand pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("Failed to render {template}: {message}")]
    Template { template: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to copy {src} to {dest}: {message}")]
    Copy {
        src: String,
        dest: String,
        message: String,
    },
}

/// Expand glob patterns into a flat file list, in input order.
pub fn expand(patterns: &[String]) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matches = glob::glob(pattern).map_err(|e| BuildError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for path in matches {
            files.push(path.map_err(|e| BuildError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?);
        }
    }

    Ok(files)
}

/// Builds a style guide site from scraped documentation.
///
/// Owns one component collection, one view collection, and one template
/// engine per instance; a fresh generator is created per build
/// invocation.
pub struct SiteGenerator {
    options: SiteOptions,
    engine: TemplateEngine,
    components: ComponentsCollection,
    views: ViewsCollection,
}

impl SiteGenerator {
    /// Create a generator for the given options.
    pub fn new(options: SiteOptions) -> Self {
        let mut search_paths = vec![options.src.clone()];
        search_paths.extend(options.template_paths.iter().cloned());

        let engine = TemplateEngine::new(search_paths);
        let components = ComponentsCollection::new(options.strategy.clone());
        let views = ViewsCollection::new(
            options.src.clone(),
            options.dest.clone(),
            options.strategy.clone(),
        );

        Self {
            options,
            engine,
            components,
            views,
        }
    }

    /// Build the style guide.
    ///
    /// Stages run strictly in sequence: place defaults, scrape
    /// components, collect views, render the index, render component
    /// pages, render view pages, copy stylesheets. Page renders within a
    /// stage run in parallel and the stage fails on the first error.
    pub async fn build(
        &mut self,
        patterns: &[String],
        views_dir: Option<&str>,
    ) -> Result<BuildSummary, BuildError> {
        let start = Instant::now();

        if self.place()? {
            tracing::info!("Placed default assets in {}", self.options.src.display());
        }

        fs::create_dir_all(&self.options.dest).map_err(|e| BuildError::Write {
            path: self.options.dest.display().to_string(),
            message: e.to_string(),
        })?;

        let files = expand(patterns)?;
        tracing::debug!("Scraping {} files", files.len());
        self.components.scrape(&files, &self.engine)?;

        if let Some(dir) = views_dir {
            self.views.collect(dir)?;
        }

        self.build_index()?;
        let component_pages = self.build_components()?;
        let view_pages = self.build_views()?;
        self.copy_styles()?;

        let skipped = self.components.diagnostics().len() + self.views.diagnostics().len();
        if skipped > 0 {
            tracing::warn!("{} documentation records were dropped", skipped);
        }

        Ok(BuildSummary {
            components: self.components.len(),
            views: self.views.len(),
            pages: 1 + component_pages + view_pages,
            skipped,
            duration_ms: start.elapsed().as_millis() as u64,
            dest: self.options.dest.clone(),
        })
    }

    /// Place the default skeleton; no-op when the source directory
    /// already holds an index template.
    pub fn place(&self) -> Result<bool, BuildError> {
        assets::place(&self.options.src).map_err(|e| BuildError::Place {
            path: self.options.src.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Copy explicit src-dest file mappings, in order.
    ///
    /// Mappings whose source does not exist are skipped with a warning;
    /// returns the number of files copied.
    pub fn copy(&self, mappings: &[(PathBuf, PathBuf)]) -> Result<usize, BuildError> {
        let mut copied = 0;

        for (src, dest) in mappings {
            if !src.is_file() {
                tracing::warn!("Skipping copy of missing file {}", src.display());
                continue;
            }

            copy_file(src, dest)?;
            copied += 1;
        }

        Ok(copied)
    }

    /// Records dropped across both collections.
    pub fn diagnostics(&self) -> impl Iterator<Item = &patina_collect::Diagnostic> {
        self.components
            .diagnostics()
            .iter()
            .chain(self.views.diagnostics())
    }

    fn build_index(&self) -> Result<(), BuildError> {
        let context = minijinja::context! {
            path_to_root => "",
            components => self.components.components(),
            views => self.views.views(),
        };

        let html = self
            .engine
            .render("index.html", context)
            .map_err(|e| BuildError::Template {
                template: "index.html".to_string(),
                message: e.to_string(),
            })?;

        write_page(&self.options.dest.join("index.html"), &html)
    }

    fn build_components(&self) -> Result<usize, BuildError> {
        let components = self.components.components();
        let all: Vec<_> = components.values().flatten().collect();

        let results: Vec<Result<(), BuildError>> = all
            .par_iter()
            .map(|component| {
                let template = component
                    .template
                    .as_deref()
                    .unwrap_or(&self.options.default_template);

                let context = minijinja::context! {
                    path_to_root => "../",
                    component => component,
                    components => components,
                    views => self.views.views(),
                };

                let html =
                    self.engine
                        .render(template, context)
                        .map_err(|e| BuildError::Template {
                            template: template.to_string(),
                            message: e.to_string(),
                        })?;

                write_page(&self.options.dest.join(&component.path), &html)
            })
            .collect();

        for result in results {
            result?;
        }

        Ok(all.len())
    }

    fn build_views(&self) -> Result<usize, BuildError> {
        let views = self.views.views();

        let results: Vec<Result<(), BuildError>> = views
            .par_iter()
            .map(|view| {
                let context = minijinja::context! {
                    path_to_root => path_to_root(&view.path),
                    components => self.components.components(),
                    view => view,
                    views => views,
                };

                let html =
                    self.engine
                        .render(&view.path, context)
                        .map_err(|e| BuildError::Template {
                            template: view.path.clone(),
                            message: e.to_string(),
                        })?;

                write_page(&view.dest, &html)
            })
            .collect();

        for result in results {
            result?;
        }

        Ok(views.len())
    }

    /// Mirror the source `css/` directory into the destination.
    fn copy_styles(&self) -> Result<(), BuildError> {
        let css_dir = self.options.src.join("css");
        if !css_dir.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(&css_dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&css_dir).unwrap_or(entry.path());
            copy_file(entry.path(), &self.options.dest.join("css").join(relative))?;
        }

        Ok(())
    }
}

/// One `../` per directory level of a source-relative page path.
fn path_to_root(path: &str) -> String {
    "../".repeat(path.matches('/').count())
}

fn write_page(path: &Path, html: &str) -> Result<(), BuildError> {
    let write_error = |e: std::io::Error| BuildError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    fs::write(path, html).map_err(write_error)
}

fn copy_file(src: &Path, dest: &Path) -> Result<(), BuildError> {
    let copy_error = |e: std::io::Error| BuildError::Copy {
        src: src.display().to_string(),
        dest: dest.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(copy_error)?;
    }

    fs::copy(src, dest).map_err(copy_error)?;

    Ok(())
}
