//! # halosync-renderer
//!
//! CommonMark renderer that produces the `content.content` HTML stored next
//! to a post's raw Markdown.
//!
//! ## Usage
//!
//! ```rust
//! use halosync_core::MarkdownRenderer;
//! use halosync_renderer::Renderer;
//!
//! let html = Renderer::default().render("# Hello\n\nworld");
//! assert!(html.contains("<h1>Hello</h1>"));
//! ```

pub mod engine;

pub use engine::{RenderOptions, Renderer};
