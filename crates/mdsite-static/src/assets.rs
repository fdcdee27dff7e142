//! Stylesheet resolution and processing.
//!
//! The site stylesheet has two sources tried in order: `styles.css` in the
//! template resource directory, then the stylesheet built into the binary.
//! Failing to read the first is never fatal.

use std::io;
use std::path::{Path, PathBuf};

/// Resource name of the site stylesheet.
pub const STYLESHEET_RESOURCE: &str = "styles.css";

/// Read-only access to template resources on disk.
#[derive(Debug, Clone, Default)]
pub struct TemplateResources {
    dir: Option<PathBuf>,
}

impl TemplateResources {
    /// Resources looked up under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// No resource directory; every lookup falls back to built-in defaults.
    pub fn none() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Read a resource by its path relative to the resource directory.
    pub async fn read(&self, relative: &str) -> io::Result<Vec<u8>> {
        let Some(dir) = &self.dir else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no template resource directory configured",
            ));
        };
        tokio::fs::read(dir.join(relative)).await
    }
}

/// Where the stylesheet of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSource {
    /// Read from the template resource directory
    Resource(PathBuf),
    /// The built-in default
    Default,
}

/// The resolved site stylesheet.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub content: String,
    pub source: StylesheetSource,
}

impl Stylesheet {
    /// Resolve the stylesheet, falling back to [`DEFAULT_CSS`] on any failure.
    pub async fn resolve(resources: &TemplateResources) -> Self {
        match resources.read(STYLESHEET_RESOURCE).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => {
                    let path = resources
                        .dir()
                        .map(|d| d.join(STYLESHEET_RESOURCE))
                        .unwrap_or_else(|| PathBuf::from(STYLESHEET_RESOURCE));
                    tracing::debug!("Using stylesheet from {}", path.display());
                    return Self {
                        content,
                        source: StylesheetSource::Resource(path),
                    };
                }
                Err(e) => {
                    tracing::warn!("Stylesheet resource is not valid UTF-8, using default: {}", e);
                }
            },
            Err(e) if resources.dir().is_some() => {
                tracing::warn!("Could not read stylesheet resource, using default: {}", e);
            }
            Err(_) => {}
        }

        Self::default()
    }

    /// Minify in place, keeping the original text if lightningcss rejects it.
    pub fn minify(mut self) -> Self {
        match AssetPipeline::minify_css(&self.content) {
            Ok(minified) => self.content = minified,
            Err(e) => tracing::warn!("Keeping unminified stylesheet: {}", e),
        }
        self
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            content: DEFAULT_CSS.to_string(),
            source: StylesheetSource::Default,
        }
    }
}

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Dark theme. --accent-color and --accent-text-color are overridden per page.
pub const DEFAULT_CSS: &str = r#"/* mdsite default theme */
:root {
  --bg-color: #1e1e1e;
  --text-color: #d4d4d4;
  --muted-color: #a0a0a0;
  --header-bg: #252526;
  --sidebar-bg: #252526;
  --code-bg: #2d2d2d;
  --border-color: #3e3e42;
  --accent-color: #007acc;
  --accent-text-color: #000000;
  --sidebar-width: 250px;
  --content-max-width: 800px;
}

body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  min-height: 100vh;
  background-color: var(--bg-color);
  color: var(--text-color);
  line-height: 1.6;
}

header {
  background-color: var(--header-bg);
  border-bottom: 1px solid var(--border-color);
  padding: 1rem;
  display: flex;
  align-items: center;
  gap: 1rem;
}

header h1 {
  margin: 0;
  font-size: 1.5rem;
  color: var(--accent-color);
}

.container {
  display: flex;
  flex: 1;
  position: relative;
}

/* Sidebar */
nav {
  width: var(--sidebar-width);
  background-color: var(--sidebar-bg);
  border-right: 1px solid var(--border-color);
  padding: 1rem;
  flex-shrink: 0;
}

nav ul {
  list-style: none;
  padding: 0;
  margin: 0;
}

nav li {
  margin-bottom: 0.5rem;
}

nav a {
  color: var(--text-color);
  text-decoration: none;
  display: block;
  padding: 0.5rem;
  border-radius: 4px;
  transition: background-color 0.2s;
}

nav a:hover,
nav li.active > a {
  background-color: var(--accent-color);
  color: var(--accent-text-color);
}

/* Content */
main {
  flex: 1;
  padding: 2rem;
  max-width: var(--content-max-width);
  overflow-x: auto;
}

main h1,
main h2,
main h3,
main h4,
main h5,
main h6 {
  color: var(--accent-color);
  margin-top: 1.5em;
  margin-bottom: 0.5em;
}

main a {
  color: var(--accent-color);
  text-decoration: none;
}

main a:hover {
  text-decoration: underline;
}

main code {
  background-color: var(--code-bg);
  padding: 0.2em 0.4em;
  border-radius: 3px;
  font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, Courier, monospace;
}

main pre {
  background-color: var(--code-bg);
  padding: 1rem;
  border-radius: 5px;
  overflow-x: auto;
}

main pre code {
  background-color: transparent;
  padding: 0;
}

main blockquote {
  border-left: 4px solid var(--accent-color);
  margin: 0;
  padding-left: 1rem;
  color: var(--muted-color);
}

main table {
  border-collapse: collapse;
}

main th,
main td {
  border: 1px solid var(--border-color);
  padding: 0.4rem 0.8rem;
}

footer {
  background-color: var(--header-bg);
  border-top: 1px solid var(--border-color);
  padding: 1rem;
  text-align: center;
  margin-top: auto;
  font-size: 0.9rem;
  color: #808080;
}

/* Sidebar toggle */
#sidebar-toggle {
  display: none;
  background: none;
  border: none;
  cursor: pointer;
  padding: 0.5rem;
  flex-direction: column;
  gap: 5px;
}

.bar {
  width: 25px;
  height: 3px;
  background-color: var(--text-color);
  display: block;
  border-radius: 2px;
}

/* Responsive */
@media (max-width: 768px) {
  #sidebar-toggle {
    display: flex;
  }

  nav {
    position: absolute;
    top: 0;
    left: calc(-1 * (var(--sidebar-width) + 30px));
    height: 100%;
    z-index: 1000;
    transition: left 0.3s ease;
    box-shadow: 2px 0 10px rgba(0, 0, 0, 0.5);
  }

  nav.active {
    left: 0;
  }

  main {
    padding: 1rem;
  }
}
"#;
