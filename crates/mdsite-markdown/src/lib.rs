//! Markdown rendering for mdsite.
//!
//! The site engine treats rendering as a black box: one document's text goes
//! in, an HTML fragment comes out. [`MarkupRenderer`] is that seam and
//! [`CommonMark`] is the implementation backed by pulldown-cmark.

pub mod renderer;

pub use renderer::{CommonMark, MarkupRenderer};
