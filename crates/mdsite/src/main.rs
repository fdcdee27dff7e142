//! mdsite CLI - turn Markdown documents into a static documentation site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod scan;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Turn Markdown documents into a static documentation site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace root (defaults to the current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Path to the config file, relative to the workspace root
    #[arg(short, long, default_value = "mdsite.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write mdsite.toml and an editable stylesheet into the workspace
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate the site
    Build(commands::build::BuildArgs),
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

    let root = commands::workspace_root(cli.root);

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(root, yes).await?;
        }
        Commands::Build(args) => {
            commands::build::run(root, &cli.config, args).await?;
        }
    }

    Ok(())
}
