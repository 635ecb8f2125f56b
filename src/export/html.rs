//! HTML Export Generation
//!
//! This module wraps rendered Markdown in a complete, standalone HTML
//! document with an embedded style sheet.

use crate::markdown::{escape_html, render_with, MarkdownOptions};

/// Title used when the caller has none.
pub const DEFAULT_TITLE: &str = "Exported Document";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document from markdown content.
///
/// The body is exactly the preview renderer's output, so the exported page
/// matches what the user saw.
///
/// # Example
/// ```
/// use readme_genius::export::to_html_document;
///
/// let html = to_html_document("# Hi", Some("README"));
/// assert!(html.starts_with("<!DOCTYPE html>"));
/// assert!(html.contains("<title>README</title>"));
/// assert!(html.contains("<h1>Hi</h1>"));
/// ```
pub fn to_html_document(markdown: &str, title: Option<&str>) -> String {
    to_html_document_with(markdown, title, &MarkdownOptions::default())
}

/// Generate a complete HTML document using explicit render options.
pub fn to_html_document_with(
    markdown: &str,
    title: Option<&str>,
    options: &MarkdownOptions,
) -> String {
    let html_body = render_with(markdown, options);
    let doc_title = title.filter(|t| !t.trim().is_empty()).unwrap_or(DEFAULT_TITLE);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="readme-genius">
    <title>{title}</title>
    <style>
{base_css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>
"#,
        title = escape_html(doc_title),
        base_css = BASE_CSS,
        body = html_body,
    )
}

/// Markdown export is the buffer itself.
pub fn to_markdown_file(markdown: &str) -> String {
    markdown.to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Style sheet embedded in every exported document.
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
    color: #333;
    background-color: #fff;
}

.markdown-body {
    max-width: 800px;
    margin: 0 auto;
    padding: 20px;
}

/* Headings */
.markdown-body h1,
.markdown-body h2,
.markdown-body h3,
.markdown-body h4,
.markdown-body h5,
.markdown-body h6 {
    margin-top: 1.5em;
    margin-bottom: 0.5em;
    line-height: 1.2;
}

.markdown-body h1 { font-size: 2em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
.markdown-body h2 { font-size: 1.5em; border-bottom: 1px solid #eaecef; padding-bottom: 0.3em; }
.markdown-body h3 { font-size: 1.2em; }

/* Paragraphs */
.markdown-body p {
    margin: 1em 0;
}

/* Links */
.markdown-body a {
    color: #0366d6;
    text-decoration: none;
}

.markdown-body a:hover {
    text-decoration: underline;
}

/* Lists */
.markdown-body ul,
.markdown-body ol {
    margin: 1em 0;
    padding-left: 2em;
}

.markdown-body li {
    margin-bottom: 0.5em;
}

/* Blockquotes */
.markdown-body blockquote {
    margin: 1em 0;
    padding-left: 1em;
    border-left: 4px solid #ddd;
    color: #666;
}

/* Code */
.markdown-body code {
    font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, Courier, monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 3px;
    background-color: #f0f0f0;
}

.markdown-body pre {
    margin: 1em 0;
    padding: 1em;
    overflow-x: auto;
    border-radius: 5px;
    background-color: #f0f0f0;
}

.markdown-body pre code {
    padding: 0;
    background: transparent;
    font-size: 0.9em;
}

/* Horizontal rule */
.markdown-body hr {
    height: 2px;
    margin: 24px 0;
    border: none;
    background-color: #e1e4e8;
}

/* Images */
.markdown-body img {
    max-width: 100%;
    height: auto;
    border-radius: 5px;
    margin: 10px 0;
}

/* Strikethrough */
.markdown-body del {
    text-decoration: line-through;
}
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
