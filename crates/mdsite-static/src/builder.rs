//! Static site builder.
//!
//! A build walks through a fixed sequence of [`Stage`]s. Layout planning is
//! pure and is the first stage, so path collisions and an invalid accent
//! color are reported without touching the output tree. Nothing is
//! retried and nothing already written is cleaned up on failure.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use mdsite_markdown::{CommonMark, MarkupRenderer};

use crate::assets::{Stylesheet, StylesheetSource, TemplateResources, STYLESHEET_RESOURCE};
use crate::layout::{plan_layout, GeneratedPage, LayoutError, HTML_DIR};
use crate::navigation::INDEX_FILE;
use crate::templates::{TemplateEngine, CSS_DIR};
use crate::theme::{ColorError, Theme};

/// Presentation options shared by every page of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOptions {
    /// Theme accent color, 3 or 6 hex digits
    pub accent_color: String,
    /// Shown in the header and every `<title>`
    pub site_title: String,
    /// Shown in the footer
    pub footer_text: String,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            accent_color: "#007acc".to_string(),
            site_title: "Documentation".to_string(),
            footer_text: String::new(),
        }
    }
}

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Workspace root the source documents live under
    pub workspace_root: Option<PathBuf>,

    /// Output root, relative to the workspace root unless absolute
    pub output_dir: PathBuf,

    /// Template resource directory holding an optional `styles.css`
    pub templates_dir: Option<PathBuf>,

    /// Minify the stylesheet
    pub minify: bool,

    /// Presentation options
    pub options: SiteOptions,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workspace_root: None,
            output_dir: PathBuf::from("docs"),
            templates_dir: None,
            minify: false,
            options: SiteOptions::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of document pages generated, not counting the index
    pub pages: usize,

    /// Output root
    pub output_dir: PathBuf,

    /// Where the stylesheet came from
    pub stylesheet: StylesheetSource,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No output root: {0}")]
    MissingOutputRoot(String),

    #[error("Invalid accent color: {0}")]
    InvalidColor(#[from] ColorError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Failed to read {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Steps of a build, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    LayoutDiscovered,
    DirectoriesPrepared,
    StylesheetWritten,
    PagesWritten,
    IndexWritten,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::LayoutDiscovered => "layout discovered",
            Self::DirectoriesPrepared => "directories prepared",
            Self::StylesheetWritten => "stylesheet written",
            Self::PagesWritten => "pages written",
            Self::IndexWritten => "index written",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Static site builder.
pub struct SiteGenerator {
    config: BuildConfig,
    renderer: Box<dyn MarkupRenderer>,
    templates: TemplateEngine,
}

impl SiteGenerator {
    /// Create a new builder rendering documents as CommonMark.
    pub fn new(config: BuildConfig) -> Self {
        Self::with_renderer(config, CommonMark::new())
    }

    /// Create a new builder with a custom markup renderer.
    pub fn with_renderer(config: BuildConfig, renderer: impl MarkupRenderer + 'static) -> Self {
        Self {
            config,
            renderer: Box::new(renderer),
            templates: TemplateEngine::new(),
        }
    }

    /// Build the site from the given source documents.
    ///
    /// Sources are planned and rendered in the order given; that order is
    /// also the navigation order.
    pub async fn build(&self, sources: &[PathBuf]) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        enter(Stage::Idle);

        let workspace_root = self.resolve_workspace_root()?;
        let site_root = self.site_root(&workspace_root);
        let theme = Theme::from_accent(&self.config.options.accent_color)?;
        let pages = plan_layout(sources, &workspace_root)?;
        enter(Stage::LayoutDiscovered);

        self.prepare_directories(&site_root)?;
        enter(Stage::DirectoriesPrepared);

        let stylesheet = self.write_stylesheet(&site_root).await?;
        enter(Stage::StylesheetWritten);

        self.write_pages(&pages, &site_root, &theme)?;
        enter(Stage::PagesWritten);

        self.write_index(&pages, &site_root, &theme)?;
        enter(Stage::IndexWritten);

        let duration = start.elapsed();
        enter(Stage::Done);

        Ok(BuildResult {
            pages: pages.len(),
            output_dir: site_root,
            stylesheet: stylesheet.source,
            duration_ms: duration.as_millis() as u64,
        })
    }

    /// The workspace root must exist and be a directory.
    fn resolve_workspace_root(&self) -> Result<PathBuf, BuildError> {
        let Some(root) = &self.config.workspace_root else {
            return Err(BuildError::MissingOutputRoot(
                "no workspace root configured".to_string(),
            ));
        };

        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(root.clone()),
            Ok(_) => Err(BuildError::MissingOutputRoot(format!(
                "{} is not a directory",
                root.display()
            ))),
            Err(e) => Err(BuildError::MissingOutputRoot(format!(
                "{}: {}",
                root.display(),
                e
            ))),
        }
    }

    fn site_root(&self, workspace_root: &Path) -> PathBuf {
        if self.config.output_dir.is_absolute() {
            self.config.output_dir.clone()
        } else {
            workspace_root.join(&self.config.output_dir)
        }
    }

    /// Create the site root and its `css` and `html` folders.
    ///
    /// Existing directories and their contents are left untouched.
    fn prepare_directories(&self, site_root: &Path) -> Result<(), BuildError> {
        for dir in [
            site_root.to_path_buf(),
            site_root.join(CSS_DIR),
            site_root.join(HTML_DIR),
        ] {
            create_dir(&dir)?;
        }
        Ok(())
    }

    async fn write_stylesheet(&self, site_root: &Path) -> Result<Stylesheet, BuildError> {
        let resources = match &self.config.templates_dir {
            Some(dir) => TemplateResources::new(dir),
            None => TemplateResources::none(),
        };

        let mut stylesheet = Stylesheet::resolve(&resources).await;
        if self.config.minify {
            stylesheet = stylesheet.minify();
        }

        let path = site_root.join(CSS_DIR).join(STYLESHEET_RESOURCE);
        write_file(&path, &stylesheet.content)?;
        tracing::debug!("Wrote {}", path.display());

        Ok(stylesheet)
    }

    /// Render every planned page in parallel.
    fn write_pages(
        &self,
        pages: &[GeneratedPage],
        site_root: &Path,
        theme: &Theme,
    ) -> Result<(), BuildError> {
        pages
            .par_iter()
            .try_for_each(|page| self.write_page(page, pages, site_root, theme))
    }

    fn write_page(
        &self,
        page: &GeneratedPage,
        pages: &[GeneratedPage],
        site_root: &Path,
        theme: &Theme,
    ) -> Result<(), BuildError> {
        let source =
            fs::read_to_string(&page.source_path).map_err(|e| BuildError::DocumentRead {
                path: page.source_path.clone(),
                source: e,
            })?;

        let content = self.renderer.render(&source);
        let output_path = page.output_path(site_root);

        let html = self.templates.wrap_html(
            &content,
            &page.title,
            pages,
            &output_path,
            site_root,
            theme,
            &self.config.options,
        )?;

        if let Some(parent) = output_path.parent() {
            create_dir(parent)?;
        }
        write_file(&output_path, &html)?;
        tracing::debug!("Generated {}", page.output_relative_path.display());

        Ok(())
    }

    fn write_index(
        &self,
        pages: &[GeneratedPage],
        site_root: &Path,
        theme: &Theme,
    ) -> Result<(), BuildError> {
        let index_path = site_root.join(INDEX_FILE);
        let content = self.templates.render_index(pages)?;

        let html = self.templates.wrap_html(
            &content,
            "Home",
            pages,
            &index_path,
            site_root,
            theme,
            &self.config.options,
        )?;

        write_file(&index_path, &html)?;
        tracing::debug!("Generated {}", INDEX_FILE);

        Ok(())
    }
}

fn enter(stage: Stage) {
    tracing::debug!("Build stage: {}", stage);
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| BuildError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|e| BuildError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config(root: &Path) -> BuildConfig {
        BuildConfig {
            workspace_root: Some(root.to_path_buf()),
            options: SiteOptions {
                accent_color: "#ff0000".to_string(),
                site_title: "Docs".to_string(),
                footer_text: "© 2024".to_string(),
            },
            ..Default::default()
        }
    }

    /// Two documents in different folders, as absolute paths.
    fn scenario(root: &Path) -> Vec<PathBuf> {
        let intro = root.join("docs/intro.md");
        let setup = root.join("guide/setup.md");
        write(&intro, "# Intro\n\nWelcome.");
        write(&setup, "# Setup\n\nRun `make`.");
        vec![intro, setup]
    }

    fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let mut stack = vec![dir.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().is_some_and(|e| e == ext) {
                    found.push(path);
                }
            }
        }
        found.sort();
        found
    }

    fn hrefs(html: &str) -> Vec<String> {
        html.split("href=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, String> {
        files_with_extension(dir, "html")
            .into_iter()
            .map(|p| {
                let contents = fs::read_to_string(&p).unwrap();
                (p.strip_prefix(dir).unwrap().to_path_buf(), contents)
            })
            .collect()
    }

    #[tokio::test]
    async fn builds_two_document_site() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let sources = scenario(root);

        let result = SiteGenerator::new(config(root))
            .build(&sources)
            .await
            .unwrap();

        let site = root.join("docs");
        assert_eq!(result.pages, 2);
        assert_eq!(result.output_dir, site);
        assert_eq!(result.stylesheet, StylesheetSource::Default);
        assert!(site.join("html/docs/intro.html").is_file());
        assert!(site.join("html/guide/setup.html").is_file());
        assert!(site.join("index.html").is_file());
        assert!(site.join("css/styles.css").is_file());

        let index = fs::read_to_string(site.join("index.html")).unwrap();
        assert!(index.contains(r#"<li><a href="html/docs/intro.html">intro</a></li>"#));
        assert!(index.contains(r#"<li><a href="html/guide/setup.html">setup</a></li>"#));
        assert!(index.contains("<title>Home - Docs</title>"));

        let intro = fs::read_to_string(site.join("html/docs/intro.html")).unwrap();
        assert!(intro.contains("<h1>Intro</h1>"));
        assert!(intro.contains("<title>intro - Docs</title>"));
        assert!(intro.contains("<p>© 2024</p>"));
        assert!(intro.contains("--accent-color: #ff0000;"));
    }

    #[tokio::test]
    async fn produces_one_page_per_document_plus_index() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let mut sources = Vec::new();
        for name in ["a.md", "b/c.md", "b/d.md", ".hidden/e.md", "x/y/z/f.md"] {
            let path = root.join("src").join(name);
            write(&path, "text");
            sources.push(path);
        }

        SiteGenerator::new(config(root))
            .build(&sources)
            .await
            .unwrap();

        let site = root.join("docs");
        assert_eq!(files_with_extension(&site, "html").len(), sources.len() + 1);
        assert_eq!(files_with_extension(&site, "css").len(), 1);
        assert!(site.join("html/src/hidden/e.html").is_file());
    }

    #[tokio::test]
    async fn every_link_points_at_a_written_file() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let mut sources = scenario(root);
        let deep = root.join("a/b/c/deep.md");
        write(&deep, "deep");
        let top = root.join("top.md");
        write(&top, "top");
        sources.extend([deep, top]);

        SiteGenerator::new(config(root))
            .build(&sources)
            .await
            .unwrap();

        let site = root.join("docs");
        let pages = files_with_extension(&site, "html");
        for page in &pages {
            let html = fs::read_to_string(page).unwrap();
            let links = hrefs(&html);
            // stylesheet + Home + every document, plus the list on the index
            assert!(links.len() >= 1 + pages.len(), "short nav in {page:?}");
            for href in links {
                let decoded = percent_decode_str(&href).decode_utf8().unwrap();
                let target = page.parent().unwrap().join(decoded.as_ref());
                assert!(target.is_file(), "{href} from {page:?} is dangling");
            }
        }
    }

    #[tokio::test]
    async fn links_to_oddly_named_documents_resolve() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let odd = root.join("odd dir/c# 100%?.md");
        write(&odd, "odd");
        let plain = root.join("plain.md");
        write(&plain, "plain");

        SiteGenerator::new(config(root))
            .build(&[odd, plain])
            .await
            .unwrap();

        let site = root.join("docs");
        let index = fs::read_to_string(site.join("index.html")).unwrap();
        let href = "html/odd%20dir/c%23%20100%25%3F.html";
        assert!(index.contains(&format!(r#"<li><a href="{href}">c# 100%?</a></li>"#)));

        let decoded = percent_decode_str(href).decode_utf8().unwrap();
        assert!(site.join(decoded.as_ref()).is_file());

        let plain_page = fs::read_to_string(site.join("html/plain.html")).unwrap();
        assert!(plain_page.contains(r#"href="odd%20dir/c%23%20100%25%3F.html""#));
    }

    #[tokio::test]
    async fn rebuilding_is_byte_identical() {
        let first_dir = tempdir().unwrap();
        let second_dir = tempdir().unwrap();

        let mut snapshots = Vec::new();
        for temp in [&first_dir, &second_dir] {
            let root = temp.path();
            let sources = scenario(root);
            SiteGenerator::new(config(root))
                .build(&sources)
                .await
                .unwrap();
            snapshots.push(snapshot(&root.join("docs")));
        }

        assert_eq!(snapshots[0], snapshots[1]);
    }

    #[tokio::test]
    async fn missing_workspace_root_writes_nothing() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("does-not-exist");

        let result = SiteGenerator::new(config(&root)).build(&[]).await;

        assert!(matches!(result, Err(BuildError::MissingOutputRoot(_))));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unset_workspace_root_is_rejected() {
        let config = BuildConfig::default();

        let result = SiteGenerator::new(config).build(&[]).await;

        assert!(matches!(result, Err(BuildError::MissingOutputRoot(_))));
    }

    #[tokio::test]
    async fn invalid_accent_fails_before_any_write() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let sources = scenario(root);
        let mut config = config(root);
        config.options.accent_color = "#12345".to_string();

        let result = SiteGenerator::new(config).build(&sources).await;

        assert!(matches!(result, Err(BuildError::InvalidColor(_))));
        assert!(!root.join("docs/css").exists());
    }

    #[tokio::test]
    async fn collisions_fail_before_any_write() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let hidden = root.join("a/.x/page.md");
        let plain = root.join("a/x/page.md");
        write(&hidden, "one");
        write(&plain, "two");

        let result = SiteGenerator::new(config(root))
            .build(&[hidden, plain])
            .await;

        assert!(matches!(
            result,
            Err(BuildError::Layout(LayoutError::Collision { .. }))
        ));
        assert!(!root.join("docs/css").exists());
    }

    #[tokio::test]
    async fn unreadable_document_aborts_the_run() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let missing = root.join("gone.md");

        let result = SiteGenerator::new(config(root)).build(&[missing]).await;

        assert!(matches!(result, Err(BuildError::DocumentRead { .. })));
        assert!(!root.join("docs/index.html").exists());
    }

    #[tokio::test]
    async fn uses_stylesheet_from_templates_dir() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        write(&root.join("templates/styles.css"), "body { color: teal; }");
        let mut config = config(root);
        config.templates_dir = Some(root.join("templates"));

        let result = SiteGenerator::new(config).build(&[]).await.unwrap();

        assert_eq!(
            result.stylesheet,
            StylesheetSource::Resource(root.join("templates/styles.css"))
        );
        assert_eq!(
            fs::read_to_string(root.join("docs/css/styles.css")).unwrap(),
            "body { color: teal; }"
        );
    }

    #[tokio::test]
    async fn existing_output_is_kept_and_overwritten() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let sources = scenario(root);
        write(&root.join("docs/CNAME"), "example.com");
        write(&root.join("docs/index.html"), "stale");

        SiteGenerator::new(config(root))
            .build(&sources)
            .await
            .unwrap();

        assert_eq!(
            fs::read_to_string(root.join("docs/CNAME")).unwrap(),
            "example.com"
        );
        let index = fs::read_to_string(root.join("docs/index.html")).unwrap();
        assert!(index.starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn empty_input_still_writes_index() {
        let temp = tempdir().unwrap();
        let root = temp.path();

        let result = SiteGenerator::new(config(root)).build(&[]).await.unwrap();

        assert_eq!(result.pages, 0);
        let index = fs::read_to_string(root.join("docs/index.html")).unwrap();
        assert!(index.contains("<strong>Home</strong>"));
    }

    #[tokio::test]
    async fn custom_renderer_is_used() {
        struct Shouting;
        impl MarkupRenderer for Shouting {
            fn render(&self, source: &str) -> String {
                format!("<p>{}</p>", source.to_uppercase())
            }
        }

        let temp = tempdir().unwrap();
        let root = temp.path();
        let page = root.join("loud.md");
        write(&page, "hello");

        SiteGenerator::with_renderer(config(root), Shouting)
            .build(&[page])
            .await
            .unwrap();

        let html = fs::read_to_string(root.join("docs/html/loud.html")).unwrap();
        assert!(html.contains("<p>HELLO</p>"));
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::LayoutDiscovered.to_string(), "layout discovered");
        assert_eq!(Stage::DirectoriesPrepared.to_string(), "directories prepared");
        assert_eq!(Stage::Done.to_string(), "done");
    }
}
