//! Page assembly using minijinja.
//!
//! Every page, the index included, goes through the same `page.html`
//! template so the header, sidebar, footer and theme variables are identical
//! across the site.

use std::path::Path;

use minijinja::{Environment, Value};
use serde::Serialize;

use crate::assets::STYLESHEET_RESOURCE;
use crate::builder::SiteOptions;
use crate::layout::GeneratedPage;
use crate::navigation::{build_nav, relative_href, NavEntry};
use crate::theme::Theme;

/// Directory under the site root holding the stylesheet.
pub const CSS_DIR: &str = "css";

/// Context for rendering `page.html`.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Footer text
    pub footer_text: String,
    /// Accent color, verbatim
    pub accent_color: String,
    /// Resolved text color for the accent
    pub accent_text_color: String,
    /// Stylesheet link relative to the page
    pub stylesheet_href: String,
    /// Navigation set
    pub nav: Vec<NavEntry>,
    /// Rendered content HTML
    pub content: String,
}

#[derive(Debug, Serialize)]
struct IndexLink<'a> {
    title: &'a str,
    href: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_filter("href", href_filter);

        env.add_template_owned("page.html".to_string(), PAGE_TEMPLATE.to_string())
            .expect("Failed to add page template");

        env.add_template_owned("nav.html".to_string(), NAV_TEMPLATE.to_string())
            .expect("Failed to add nav template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        Self { env }
    }

    /// Render a complete page from its context.
    pub fn render_page(&self, context: &PageContext) -> Result<String, minijinja::Error> {
        self.env.get_template("page.html")?.render(context)
    }

    /// Wrap a content fragment into a complete HTML document.
    ///
    /// The stylesheet link and every navigation href are relative to the
    /// directory containing `current_output_path`.
    #[allow(clippy::too_many_arguments)]
    pub fn wrap_html(
        &self,
        content: &str,
        title: &str,
        pages: &[GeneratedPage],
        current_output_path: &Path,
        site_root: &Path,
        theme: &Theme,
        options: &SiteOptions,
    ) -> Result<String, minijinja::Error> {
        let from_dir = current_output_path.parent().unwrap_or(site_root);
        let stylesheet = site_root.join(CSS_DIR).join(STYLESHEET_RESOURCE);

        let context = PageContext {
            title: title.to_string(),
            site_title: options.site_title.clone(),
            footer_text: options.footer_text.clone(),
            accent_color: theme.accent.clone(),
            accent_text_color: theme.text.to_string(),
            stylesheet_href: relative_href(from_dir, &stylesheet),
            nav: build_nav(pages, current_output_path, site_root),
            content: content.to_string(),
        };

        self.render_page(&context)
    }

    /// Render the landing page fragment linking every page from the site root.
    pub fn render_index(&self, pages: &[GeneratedPage]) -> Result<String, minijinja::Error> {
        let links: Vec<IndexLink<'_>> = pages
            .iter()
            .map(|p| IndexLink {
                title: &p.title,
                href: p.href(),
            })
            .collect();

        self.env
            .get_template("index.html")?
            .render(minijinja::context! { pages => links })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape a link for use inside a double-quoted attribute.
///
/// Unlike the default HTML escaping, `/` is left alone so relative paths
/// stay readable in the output.
fn href_filter(value: String) -> Value {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    Value::from_safe_string(escaped)
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }} - {{ site_title }}</title>
    <link rel="stylesheet" href="{{ stylesheet_href|href }}">
    <style>
        :root {
            --accent-color: {{ accent_color }};
            --accent-text-color: {{ accent_text_color }};
        }
    </style>
</head>
<body>
    <header>
        <button id="sidebar-toggle" aria-label="Toggle Navigation" aria-controls="sidebar" aria-expanded="false">
            <span class="bar"></span>
            <span class="bar"></span>
            <span class="bar"></span>
        </button>
        <h1>{{ site_title }}</h1>
    </header>
    <div class="container">
        <nav id="sidebar">
            {% include "nav.html" %}
        </nav>
        <main>
            {{ content|safe }}
        </main>
    </div>
    <footer>
        <p>{{ footer_text }}</p>
    </footer>
    <script>
        document.addEventListener('DOMContentLoaded', () => {
            const toggle = document.getElementById('sidebar-toggle');
            const sidebar = document.getElementById('sidebar');
            if (!toggle || !sidebar) return;

            const setOpen = (open) => {
                sidebar.classList.toggle('active', open);
                toggle.setAttribute('aria-expanded', String(open));
            };

            toggle.addEventListener('click', () => {
                setOpen(!sidebar.classList.contains('active'));
            });

            document.addEventListener('click', (e) => {
                if (window.innerWidth <= 768 &&
                    sidebar.classList.contains('active') &&
                    !sidebar.contains(e.target) &&
                    !toggle.contains(e.target)) {
                    setOpen(false);
                }
            });
        });
    </script>
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<ul>
{% for entry in nav %}
                <li{% if entry.active %} class="active"{% endif %}><a href="{{ entry.href|href }}">{% if entry.home %}<strong>{{ entry.title }}</strong>{% else %}{{ entry.title }}{% endif %}</a></li>
{% endfor %}
            </ul>"##;

const INDEX_TEMPLATE: &str = r##"<h2>Welcome to the Documentation</h2>
<p>Select a page from the navigation or the list below:</p>
<ul>
{% for page in pages %}
    <li><a href="{{ page.href|href }}">{{ page.title }}</a></li>
{% endfor %}
</ul>"##;
