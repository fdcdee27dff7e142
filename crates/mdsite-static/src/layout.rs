//! Output layout planning.
//!
//! Every page needs the final location of every other page before its
//! navigation can be rendered, so layout is decided up front in one pure pass
//! that reads no document content. The resulting list of [`GeneratedPage`]s is
//! never modified afterwards.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::sanitize::sanitize;

/// Bytes that cannot appear literally in a URL path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Directory under the site root that mirrors the source tree.
pub const HTML_DIR: &str = "html";

/// A planned output page for one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    /// Absolute path of the source document
    pub source_path: PathBuf,
    /// Location relative to the site root, e.g. `html/guide/setup.html`
    pub output_relative_path: PathBuf,
    /// Display title, the source file stem
    pub title: String,
}

impl GeneratedPage {
    /// Absolute output path under `site_root`.
    pub fn output_path(&self, site_root: &Path) -> PathBuf {
        site_root.join(&self.output_relative_path)
    }

    /// The output path relative to the site root as a URL path.
    pub fn href(&self) -> String {
        url_path(&self.output_relative_path)
    }
}

/// Errors raised while planning the output layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("{path} is not inside the workspace root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{0} has no file name")]
    NoFileName(PathBuf),

    #[error("{first} and {second} both map to {output}")]
    Collision {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Plan the output location of a single document.
///
/// The document's directory relative to `workspace_root` is sanitized and
/// mirrored under `html/`, and the file is named `<stem>.html`. `.` and `..`
/// are resolved before the document is checked against the root.
pub fn plan_page(source: &Path, workspace_root: &Path) -> Result<GeneratedPage, LayoutError> {
    let root = lexical(workspace_root);
    let source_path = if source.is_absolute() {
        lexical(source)
    } else {
        lexical(&root.join(source))
    };

    let relative = source_path
        .strip_prefix(&root)
        .map_err(|_| LayoutError::OutsideRoot {
            path: source_path.clone(),
            root: root.clone(),
        })?;

    let title = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| LayoutError::NoFileName(source_path.clone()))?;

    let relative_dir = match relative.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    };

    let output_relative_path = normalize(
        &Path::new(HTML_DIR)
            .join(sanitize(&relative_dir))
            .join(format!("{title}.html")),
    );

    Ok(GeneratedPage {
        source_path,
        output_relative_path,
        title,
    })
}

/// Plan every document of a run, preserving input order.
///
/// A document listed twice is planned once. Two different documents that
/// sanitize to the same output path are rejected.
pub fn plan_layout(
    sources: &[PathBuf],
    workspace_root: &Path,
) -> Result<Vec<GeneratedPage>, LayoutError> {
    let mut pages: Vec<GeneratedPage> = Vec::with_capacity(sources.len());
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();

    for source in sources {
        let page = plan_page(source, workspace_root)?;

        if let Some(&index) = claimed.get(&page.output_relative_path) {
            let existing = &pages[index];
            if existing.source_path == page.source_path {
                tracing::debug!("Skipping duplicate input {}", page.source_path.display());
                continue;
            }
            return Err(LayoutError::Collision {
                output: page.output_relative_path,
                first: existing.source_path.clone(),
                second: page.source_path,
            });
        }

        tracing::debug!(
            "Planned {} -> {}",
            page.source_path.display(),
            page.output_relative_path.display()
        );
        claimed.insert(page.output_relative_path.clone(), pages.len());
        pages.push(page);
    }

    Ok(pages)
}

/// Drop `.` components so equal locations compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` never climbs above a root; on a relative path that runs out of
/// segments it is kept.
pub(crate) fn lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Join the normal components of a relative path with `/`, percent-encoding
/// each segment.
pub(crate) fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => {
                Some(utf8_percent_encode(&s.to_string_lossy(), SEGMENT_ENCODE_SET).to_string())
            }
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
