//! Markdown to HTML fragment conversion.

use pulldown_cmark::{html, Event, Options, Parser};

/// Converts markup text into an HTML fragment.
///
/// Implementations must be pure: the same input always yields the same
/// fragment, and rendering one document never affects another.
pub trait MarkupRenderer: Send + Sync {
    /// Render a complete document to an HTML fragment.
    fn render(&self, source: &str) -> String;
}

/// CommonMark renderer with the GitHub-flavored extensions enabled.
#[derive(Debug, Clone)]
pub struct CommonMark {
    options: Options,
    allow_raw_html: bool,
}

impl CommonMark {
    /// Create a renderer with tables, footnotes, strikethrough and task lists.
    ///
    /// Raw HTML embedded in documents is escaped and shown as text.
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
            allow_raw_html: false,
        }
    }

    /// Pass raw HTML blocks and inline tags through unchanged.
    pub fn with_raw_html(mut self, allow: bool) -> Self {
        self.allow_raw_html = allow;
        self
    }
}

impl Default for CommonMark {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for CommonMark {
    fn render(&self, source: &str) -> String {
        let allow_raw_html = self.allow_raw_html;
        let parser = Parser::new_ext(source, self.options).map(move |event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) if !allow_raw_html => Event::Text(raw),
            other => other,
        });

        let mut html_output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut html_output, parser);

        html_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_headings_and_paragraphs() {
        let html = CommonMark::new().render("# Intro\n\nHello **world**.");

        assert_eq!(
            html,
            "<h1>Intro</h1>\n<p>Hello <strong>world</strong>.</p>\n"
        );
    }

    #[test]
    fn renders_tables() {
        let source = "| a | b |\n|---|---|\n| 1 | 2 |\n";
        let html = CommonMark::new().render(source);

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn renders_strikethrough_and_tasks() {
        let html = CommonMark::new().render("- [x] ~~done~~\n- [ ] todo\n");

        assert!(html.contains("<del>done</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn escapes_raw_html_by_default() {
        let html = CommonMark::new().render("Hi <script>alert(1)</script>");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn passes_raw_html_when_allowed() {
        let html = CommonMark::new()
            .with_raw_html(true)
            .render("Hi <kbd>Ctrl</kbd>");

        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn renders_code_blocks_escaped() {
        let html = CommonMark::new().render("```html\n<div>x</div>\n```\n");

        assert!(html.contains("<pre><code class=\"language-html\">"));
        assert!(html.contains("&lt;div&gt;x&lt;/div&gt;"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = CommonMark::new();
        let source = "# Title\n\n* one\n* two\n\n[link](other.md)";

        assert_eq!(renderer.render(source), renderer.render(source));
    }
}
