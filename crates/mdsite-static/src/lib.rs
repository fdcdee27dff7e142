//! Static site generation engine for mdsite.
//!
//! Turns a list of Markdown documents into a browsable site under one output
//! root: a page per document mirroring the source tree under `html/`, a
//! landing `index.html`, shared sidebar navigation with page-relative links,
//! and one themed stylesheet in `css/`.

pub mod assets;
pub mod builder;
pub mod layout;
pub mod navigation;
pub mod sanitize;
pub mod templates;
pub mod theme;

pub use assets::{Stylesheet, StylesheetSource, TemplateResources};
pub use builder::{BuildConfig, BuildError, BuildResult, SiteGenerator, SiteOptions, Stage};
pub use layout::{GeneratedPage, LayoutError};
pub use navigation::NavEntry;
pub use theme::{resolve_text_color, ColorError, TextColor, Theme};
