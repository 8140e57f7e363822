//! pulldown-cmark rendering engine: [`RenderOptions`] and [`Renderer`].
//!
//! # Extensions
//!
//! | Option           | Markdown                         | Default |
//! |------------------|----------------------------------|---------|
//! | `tables`         | GFM pipe tables                  | on      |
//! | `strikethrough`  | `~~text~~`                       | on      |
//! | `tasklists`      | `- [ ] item`                     | on      |
//! | `footnotes`      | `[^1]` references                | on      |
//! | `raw_html`       | inline and block HTML pass-through | on    |

use pulldown_cmark::{html, Event, Options, Parser};

use halosync_core::MarkdownRenderer;

// ---------------------------------------------------------------------------
// RenderOptions
// ---------------------------------------------------------------------------

/// Which Markdown extensions are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub footnotes: bool,
    /// When off, raw HTML in the source is escaped and shown as text.
    pub raw_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: true,
            raw_html: true,
        }
    }
}

impl RenderOptions {
    fn parser_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.tasklists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        opts
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Stateless Markdown → HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render `raw` to an HTML fragment.
    pub fn render_html(&self, raw: &str) -> String {
        let parser = Parser::new_ext(raw, self.options.parser_options());
        let mut out = String::with_capacity(raw.len() + raw.len() / 2);
        if self.options.raw_html {
            html::push_html(&mut out, parser);
        } else {
            let escaped = parser.map(|event| match event {
                Event::Html(text) | Event::InlineHtml(text) => Event::Text(text),
                other => other,
            });
            html::push_html(&mut out, escaped);
        }
        out
    }
}

impl MarkdownRenderer for Renderer {
    fn render(&self, raw: &str) -> String {
        self.render_html(raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
