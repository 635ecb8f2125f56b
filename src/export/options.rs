//! Export Format Types
//!
//! This module defines the export formats and the rules for naming
//! exported files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base name used when no usable export name is available.
pub const FALLBACK_BASE_NAME: &str = "README_Generated";

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported export formats for documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The raw Markdown buffer
    #[default]
    Markdown,
    /// A standalone HTML document with embedded styles
    Html,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Markdown (.md)",
            ExportFormat::Html => "HTML (.html)",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
        }
    }

    /// Get the MIME type written alongside the content.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown;charset=utf-8",
            ExportFormat::Html => "text/html;charset=utf-8",
        }
    }

    /// Get all available export formats.
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Markdown, ExportFormat::Html]
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format '{}' (expected md or html)", other)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Naming
// ─────────────────────────────────────────────────────────────────────────────

/// Derive the download file name for `base` in `format`.
///
/// Markdown keeps a trailing `.md` and appends one otherwise; HTML drops a
/// trailing `.md` before appending `.html`.
///
/// # Example
/// ```
/// use readme_genius::export::{export_file_name, ExportFormat};
///
/// assert_eq!(export_file_name("README", ExportFormat::Markdown), "README.md");
/// assert_eq!(export_file_name("notes.md", ExportFormat::Html), "notes.html");
/// ```
pub fn export_file_name(base: &str, format: ExportFormat) -> String {
    let base = match base.trim() {
        "" => FALLBACK_BASE_NAME,
        trimmed => trimmed,
    };

    match format {
        ExportFormat::Markdown if base.ends_with(".md") => base.to_string(),
        ExportFormat::Markdown => format!("{}.md", base),
        ExportFormat::Html => {
            let stem = base.strip_suffix(".md").unwrap_or(base);
            format!("{}.html", stem)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
