//! Sidebar navigation with page-relative links.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::layout::{lexical, url_path, GeneratedPage};

/// File name of the generated landing page at the site root.
pub const INDEX_FILE: &str = "index.html";

/// One link in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    /// Display title
    pub title: String,
    /// Link relative to the page the sidebar is rendered into
    pub href: String,
    /// Whether this is the Home link
    pub home: bool,
    /// Whether the link points at the page being rendered
    pub active: bool,
}

/// Compute the relative URL from the directory `from_dir` to the file `to`.
///
/// Only the two paths matter: the shared prefix is dropped, one `..` is added
/// for every remaining segment of `from_dir`, then the rest of `to` follows.
pub fn relative_href(from_dir: &Path, to: &Path) -> String {
    let from = lexical(from_dir);
    let to = lexical(to);

    let common = from
        .components()
        .zip(to.components())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in from.components().skip(common) {
        relative.push("..");
    }
    for component in to.components().skip(common) {
        relative.push(component);
    }

    url_path(&relative)
}

/// Build the navigation set as seen from `current_output_path`.
///
/// Home comes first, then every page in layout order. The list is the same
/// for every page; only the hrefs and the active flag change.
pub fn build_nav(
    pages: &[GeneratedPage],
    current_output_path: &Path,
    site_root: &Path,
) -> Vec<NavEntry> {
    let from_dir = current_output_path.parent().unwrap_or(site_root);
    let current = lexical(current_output_path);

    let home_path = site_root.join(INDEX_FILE);
    let mut nav = Vec::with_capacity(pages.len() + 1);

    nav.push(NavEntry {
        title: "Home".to_string(),
        href: relative_href(from_dir, &home_path),
        home: true,
        active: lexical(&home_path) == current,
    });

    for page in pages {
        let target = page.output_path(site_root);
        nav.push(NavEntry {
            title: page.title.clone(),
            href: relative_href(from_dir, &target),
            home: false,
            active: lexical(&target) == current,
        });
    }

    nav
}
