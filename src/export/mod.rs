//! Document Export Module
//!
//! This module turns the editor buffer into downloadable artifacts.
//!
//! # Supported Export Formats
//!
//! - **Markdown**: The buffer unchanged
//! - **HTML**: Complete HTML document with an embedded style sheet
//!
//! # Architecture
//!
//! - `options.rs` - Export formats and file naming
//! - `html.rs` - HTML document generation

pub mod html;
pub mod options;

pub use html::{to_html_document, to_html_document_with, to_markdown_file};
pub use options::{export_file_name, ExportFormat, FALLBACK_BASE_NAME};

use crate::markdown::MarkdownOptions;
use log::info;
use serde::Serialize;

/// A finished export: what to name it, how to label it, and its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// Export `markdown` as `format`, naming the result after `base`.
pub fn export_document(markdown: &str, base: &str, format: ExportFormat) -> ExportArtifact {
    export_document_with(markdown, base, format, &MarkdownOptions::default())
}

/// Export with explicit render options (only used for HTML).
pub fn export_document_with(
    markdown: &str,
    base: &str,
    format: ExportFormat,
    options: &MarkdownOptions,
) -> ExportArtifact {
    let file_name = export_file_name(base, format);
    let content = match format {
        ExportFormat::Markdown => to_markdown_file(markdown),
        ExportFormat::Html => to_html_document_with(markdown, Some(base.trim()), options),
    };

    info!("Exported {} ({} bytes)", file_name, content.len());
    ExportArtifact {
        file_name,
        mime_type: format.mime_type(),
        content,
    }
}
