//! Markdown rendering and toolbar formatting
//!
//! This module holds the engine behind both the live preview and the HTML
//! export, plus the selection-aware text transform used by the toolbar.
//!
//! # Features
//! - Two-phase rendering: line classification into blocks, then HTML
//! - Inline spans: bold, italic, code, strikethrough, links, images
//! - Escaping before any tag is introduced
//! - Pure toolbar transforms over `(buffer, selection)`
//!
//! The supported syntax is a deliberately small README-sized subset of
//! Markdown: no tables, footnotes or nested lists.
//!
//! # Example
//! ```
//! use readme_genius::markdown::{apply_format, render, SelectionRange, ToolbarCommand};
//!
//! let html = render("# Hello\n\nThis is **bold** text.");
//! assert!(html.contains("<strong>bold</strong>"));
//!
//! let result = apply_format(
//!     "hello world",
//!     SelectionRange::new(0, 5),
//!     &ToolbarCommand::Bold.action(),
//!     &mut None::<String>,
//! );
//! assert_eq!(result.text, "**hello** world");
//! ```

mod block;
pub mod formatting;
mod inline;
mod render;

pub use block::{segment, Block, BlockKind};
pub use formatting::{
    apply_format, FormatAction, FormatKind, FormatResult, SelectionRange, ToolbarCommand,
    ValuePrompt, ValueSupplier, TOOLBAR,
};
pub use inline::{escape_html, format_inline, format_inline_with, InlineSpan};
pub use render::{render, render_blocks, render_with};

/// Configuration options for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Replace `javascript:`, `vbscript:` and non-image `data:` URLs with `#`
    pub safe_urls: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self { safe_urls: true }
    }
}
