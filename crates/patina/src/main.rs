//! patina CLI - static style guide generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "patina")]
#[command(about = "Static style guide generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to patina.toml config file
    #[arg(short, long, default_value = "patina.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold patina.toml and the style guide source tree
    Init {
        /// Overwrite existing scaffold files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the style guide site
    Build {
        /// Files or glob patterns to scrape for documentation
        /// (defaults to the patterns in patina.toml)
        patterns: Vec<String>,

        /// Source directory override
        #[arg(long)]
        src: Option<PathBuf>,

        /// Destination directory override
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Views directory, relative to the source directory
        #[arg(long)]
        views: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Build {
            patterns,
            src,
            dest,
            views,
        } => {
            commands::build::run(&cli.config, patterns, src, dest, views).await?;
        }
    }

    Ok(())
}
