//! Style guide build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use patina_scrape::Strategy;
use patina_site::{SiteGenerator, SiteOptions};

/// Configuration file structure (patina.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    scrape: ScrapeConfig,
    #[serde(default)]
    templates: TemplatesConfig,
    #[serde(default)]
    components: ComponentsConfig,
    #[serde(default)]
    views: ViewsConfig,
}

#[derive(Debug, Deserialize)]
struct PathsConfig {
    #[serde(default = "default_src")]
    src: PathBuf,
    #[serde(default = "default_dest")]
    dest: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
struct ScrapeConfig {
    /// Open/close delimiter pair bounding documentation blocks.
    delimiters: Option<[String; 2]>,

    /// Scrape YAML front matter instead of delimited blocks.
    #[serde(default)]
    front_matter: bool,
}

#[derive(Debug, Deserialize)]
struct TemplatesConfig {
    #[serde(default = "default_component_template")]
    default_component: String,

    /// Extra directories searched for templates after the source dir.
    #[serde(default)]
    search_paths: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct ComponentsConfig {
    /// Files or glob patterns to scrape.
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ViewsConfig {
    /// Views directory, relative to the source dir.
    dir: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            src: default_src(),
            dest: default_dest(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            default_component: default_component_template(),
            search_paths: Vec::new(),
        }
    }
}

fn default_src() -> PathBuf {
    PathBuf::from("styleguide/src")
}
fn default_dest() -> PathBuf {
    PathBuf::from("styleguide/dest")
}
fn default_component_template() -> String {
    "templates/component.html".to_string()
}

/// Load configuration from patina.toml if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

impl ScrapeConfig {
    fn strategy(&self) -> Strategy {
        if self.front_matter {
            return Strategy::FrontMatter;
        }

        match &self.delimiters {
            Some([open, close]) => Strategy::Delimited {
                open: open.clone(),
                close: close.clone(),
            },
            None => Strategy::Delimited {
                open: "{#".to_string(),
                close: "#}".to_string(),
            },
        }
    }
}

/// Run the build command. CLI arguments win over patina.toml.
pub async fn run(
    config_path: &Path,
    patterns: Vec<String>,
    src: Option<PathBuf>,
    dest: Option<PathBuf>,
    views: Option<String>,
) -> Result<()> {
    tracing::info!("Building style guide...");

    let config = load_config(config_path)?;

    let options = SiteOptions {
        src: src.unwrap_or(config.paths.src),
        dest: dest.unwrap_or(config.paths.dest),
        strategy: config.scrape.strategy(),
        default_template: config.templates.default_component,
        template_paths: config.templates.search_paths,
    };

    let patterns = if patterns.is_empty() {
        config.components.files
    } else {
        patterns
    };
    let views_dir = views.or(config.views.dir);

    let mut generator = SiteGenerator::new(options);
    let summary = generator.build(&patterns, views_dir.as_deref()).await?;

    tracing::info!(
        "Built {} pages ({} components, {} views) in {}ms",
        summary.pages,
        summary.components,
        summary.views,
        summary.duration_ms
    );

    if summary.skipped > 0 {
        tracing::warn!(
            "{} documentation records were dropped; run with --verbose for details",
            summary.skipped
        );
    }

    tracing::info!("Output: {}", summary.dest.display());

    Ok(())
}
