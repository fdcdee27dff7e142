//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use mdsite_static::{BuildConfig, SiteGenerator, SiteOptions};

use crate::config::{self, ConfigFile};
use crate::scan;

/// Flags for `mdsite build`. Each overrides the matching config key.
#[derive(Debug, Args, Default)]
pub struct BuildArgs {
    /// Documents to include (defaults to every Markdown file in the workspace)
    pub files: Vec<PathBuf>,

    /// Output root, relative to the workspace root
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Site title
    #[arg(long)]
    pub title: Option<String>,

    /// Accent color, e.g. "#007acc"
    #[arg(long)]
    pub accent: Option<String>,

    /// Footer text
    #[arg(long)]
    pub footer: Option<String>,

    /// Directory holding an optional styles.css
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Minify the stylesheet
    #[arg(long)]
    pub minify: bool,
}

/// Run the build command.
pub async fn run(root: Option<PathBuf>, config_path: &Path, args: BuildArgs) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = match &root {
        Some(root) => config::load(&root.join(config_path))?,
        None => ConfigFile::default(),
    };

    let sources = match &root {
        Some(root) if args.files.is_empty() => scan::find_documents(root),
        _ => args.files.iter().map(|f| absolutize(f)).collect(),
    };
    tracing::debug!("{} source documents", sources.len());

    let config = build_config(root, file_config, args);
    let result = SiteGenerator::new(config).build(&sources).await?;

    tracing::info!(
        "Built {} pages in {}ms",
        result.pages,
        result.duration_ms
    );
    tracing::info!("Site generated in {}", result.output_dir.display());

    Ok(())
}

/// Layer CLI flags over the config file over the built-in defaults.
fn build_config(root: Option<PathBuf>, file: ConfigFile, args: BuildArgs) -> BuildConfig {
    let defaults = SiteOptions::default();
    let options = SiteOptions {
        accent_color: args
            .accent
            .or(file.site.accent_color)
            .unwrap_or(defaults.accent_color),
        site_title: args.title.or(file.site.title).unwrap_or(defaults.site_title),
        footer_text: args.footer.or(file.site.footer).unwrap_or(defaults.footer_text),
    };

    let templates_dir = match (&root, args.templates.or(file.build.templates)) {
        (Some(root), Some(dir)) => Some(root.join(dir)),
        (Some(root), None) => Some(root.join("templates")).filter(|d| d.is_dir()),
        (None, dir) => dir,
    };

    BuildConfig {
        output_dir: args
            .output
            .or(file.build.output)
            .unwrap_or_else(|| PathBuf::from("docs")),
        templates_dir,
        minify: args.minify || file.build.minify.unwrap_or(false),
        options,
        workspace_root: root,
    }
}

/// Make a command-line path absolute against the current directory.
fn absolutize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    absolute.canonicalize().unwrap_or(absolute)
}
