//! Markdown Renderer
//!
//! Phase two of rendering: maps each [`Block`] from the segmenter to HTML.
//! Fenced code is escaped verbatim; every other block goes through the
//! inline formatter. A final paragraph pass wraps whatever is not already
//! block-level HTML in `<p>`.
//!
//! The same entry point feeds both the live preview and the HTML export.

use super::block::{segment, Block, BlockKind};
use super::inline::{escape_html, format_inline_with};
use super::MarkdownOptions;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

/// HTML produced for one block, before the paragraph pass.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderedBlock {
    html: String,
    /// Already block-level; the paragraph pass leaves it alone
    rendered: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Render a Markdown document to an HTML fragment with default options.
///
/// # Example
/// ```
/// use readme_genius::markdown::render;
///
/// let html = render("# Title\n\n- one\n- two");
/// assert_eq!(html, "<h1>Title</h1>\n<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");
/// ```
pub fn render(document: &str) -> String {
    render_with(document, &MarkdownOptions::default())
}

/// Render a Markdown document to an HTML fragment.
///
/// Never fails: text that matches no construct falls through to a paragraph.
/// Each block's HTML is followed by a single `\n`.
pub fn render_with(document: &str, options: &MarkdownOptions) -> String {
    let blocks = segment(document);
    let html = render_blocks(&blocks, options);
    debug!(
        "Rendered {} bytes of markdown into {} bytes of HTML",
        document.len(),
        html.len()
    );
    html
}

/// Render already segmented blocks.
pub fn render_blocks(blocks: &[Block], options: &MarkdownOptions) -> String {
    let mut html = String::new();
    for rendered in blocks.iter().filter_map(|block| render_block(block, options)) {
        if rendered.rendered {
            html.push_str(&rendered.html);
        } else {
            html.push_str("<p>");
            html.push_str(&rendered.html);
            html.push_str("</p>");
        }
        html.push('\n');
    }
    html
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn render_block(block: &Block, options: &MarkdownOptions) -> Option<RenderedBlock> {
    let html = match &block.kind {
        BlockKind::Blank => return None,
        BlockKind::Heading(level) => format!(
            "<h{level}>{}</h{level}>",
            format_inline_with(&block.raw, options),
            level = level
        ),
        BlockKind::FencedCode { language } => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(language.as_deref().unwrap_or("plaintext")),
            escape_html(&block.raw)
        ),
        BlockKind::HorizontalRule => "<hr />".to_string(),
        BlockKind::Blockquote => {
            let lines: Vec<String> = block
                .items()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format_inline_with(line, options))
                .collect();
            format!("<blockquote><p>{}</p></blockquote>", lines.join("<br />"))
        }
        BlockKind::UnorderedList => render_list("ul", block, options),
        BlockKind::OrderedList => render_list("ol", block, options),
        BlockKind::Paragraph => {
            let joined = block
                .raw
                .lines()
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" ");
            let html = format_inline_with(&joined, options);
            let rendered = block.rendered || looks_like_block_html(&html);
            return Some(RenderedBlock { html, rendered });
        }
    };

    Some(RenderedBlock {
        html,
        rendered: block.rendered,
    })
}

fn render_list(tag: &str, block: &Block, options: &MarkdownOptions) -> String {
    let mut html = format!("<{}>\n", tag);
    for item in block.items() {
        html.push_str("<li>");
        html.push_str(&format_inline_with(item.trim(), options));
        html.push_str("</li>\n");
    }
    html.push_str(&format!("</{}>", tag));
    html
}

/// Whether a paragraph's formatted HTML is already a self-contained
/// block-level element (in practice: a lone image).
fn looks_like_block_html(html: &str) -> bool {
    static BLOCK_HTML: OnceLock<Regex> = OnceLock::new();
    BLOCK_HTML
        .get_or_init(|| {
            Regex::new(
                r"(?is)^(?:<(?:h[1-6]|ul|ol|pre|blockquote)\b[^>]*>.*</(?:h[1-6]|ul|ol|pre|blockquote)>|<hr\b[^>]*>|<img\b[^>]*>)$",
            )
            .expect("valid block html pattern")
        })
        .is_match(html.trim())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
