//! `mdsite.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration file structure (mdsite.toml).
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    pub title: Option<String>,
    pub accent_color: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    /// Output root, relative to the workspace root
    pub output: Option<PathBuf>,
    /// Template resource directory, relative to the workspace root
    pub templates: Option<PathBuf>,
    pub minify: Option<bool>,
}

/// Load `path` if it exists.
///
/// A missing file yields the defaults; a malformed one is an error.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

pub const DEFAULT_CONFIG: &str = r##"# mdsite configuration

[site]
# Shown in the header and in every page title
title = "Documentation"

# Accent color for headings, links and the active nav entry (3 or 6 hex digits).
# The text color drawn on top of it is picked automatically for contrast.
accent_color = "#007acc"

# Footer text
footer = ""

[build]
# Output root, relative to the workspace root
output = "docs"

# Directory holding an optional styles.css that replaces the built-in theme
templates = "templates"

# Minify the generated stylesheet
minify = false
"##;
