//! Scaffold a style guide in the current project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing patina...");

    let config_path = Path::new("patina.toml");
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write patina.toml")?;
        tracing::info!("Created patina.toml");
    }

    let src = Path::new("styleguide/src");
    fs::create_dir_all(src).context("Failed to create styleguide/src")?;

    if patina_site::assets::place(src).context("Failed to place style guide skeleton")? {
        tracing::info!("Placed style guide skeleton in {}", src.display());
    }

    let views = src.join("views");
    fs::create_dir_all(&views).context("Failed to create views directory")?;

    let sample = Path::new("styleguide/button.css");
    if !sample.exists() || yes {
        fs::write(sample, SAMPLE_COMPONENT).context("Failed to write sample component")?;
        tracing::info!("Created {}", sample.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'patina build' to generate the style guide.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# patina configuration

[paths]
# Working directory for templates, views, and placed assets
src = "styleguide/src"

# Destination root for the generated site
dest = "styleguide/dest"

[scrape]
# Delimiters bounding YAML documentation blocks
delimiters = ["{#", "#}"]

# Scrape YAML front matter instead of delimited blocks
# front_matter = true

[templates]
# Template used for components without a `template` override
default_component = "templates/component.html"

# Extra directories searched for templates
# search_paths = ["shared/templates"]

[components]
# Files or glob patterns to scrape for documentation
files = ["styleguide/*.css"]

[views]
# Views directory, relative to the source dir
dir = "views"
"##;

const SAMPLE_COMPONENT: &str = r#"/*
{#
name: Button
category: content
description: |
  # Button

  A clickable button. Replace this sample with documentation blocks in
  your own source files, or point `description` at a Markdown file.
#}
*/

.button {
  display: inline-block;
  padding: 0.5rem 1rem;
}
"#;
