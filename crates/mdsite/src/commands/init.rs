//! Initialize mdsite in a workspace.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mdsite_static::assets::{DEFAULT_CSS, STYLESHEET_RESOURCE};

use crate::config::DEFAULT_CONFIG;

/// Run the init command.
pub async fn run(root: Option<PathBuf>, yes: bool) -> Result<()> {
    let root = root.context("No workspace root: current directory is unavailable")?;
    tracing::info!("Initializing mdsite in {}", root.display());

    write_scaffold(&root.join("mdsite.toml"), DEFAULT_CONFIG, yes)?;

    let templates_dir = root.join("templates");
    fs::create_dir_all(&templates_dir).context("Failed to create templates directory")?;
    write_scaffold(&templates_dir.join(STYLESHEET_RESOURCE), DEFAULT_CSS, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'mdsite build' to generate the site.");

    Ok(())
}

/// Write `contents` unless the file exists and `overwrite` is false.
fn write_scaffold(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}
