//! Editor session state for ReadmeGenius
//!
//! This module defines `EditorSession`, which owns the Markdown buffer being
//! edited, the baseline it was loaded from (for unsaved-change tracking),
//! the uploaded file name, and the base name used for exports.

use crate::config::Settings;
use crate::export::{export_document_with, ExportArtifact, ExportFormat, FALLBACK_BASE_NAME};
use crate::markdown::{
    apply_format, render_with, FormatResult, MarkdownOptions, SelectionRange, ToolbarCommand,
    ValueSupplier,
};
use log::{debug, info};

/// The README template shown before anything is uploaded.
pub const DEFAULT_TEMPLATE: &str = r#"# Project Title

A brief description of what this project does and who it's for.

## 🚀 Features

- Feature A: Brief description
- Feature B: Brief description
- Feature C: Brief description

## 🛠️ Installation

```bash
npm install your-package
# or
yarn add your-package
```

## ▶️ Usage

To start the development server:
```bash
npm run dev
# or
yarn dev
```

Open [http://localhost:3000](http://localhost:3000) with your browser to see the result.

## 📄 License

This project is licensed under the MIT License - see the LICENSE.md file for details.
"#;

/// Export base name for the template document.
pub const TEMPLATE_EXPORT_BASE: &str = "README_Template";

// ─────────────────────────────────────────────────────────────────────────────
// Editor Session
// ─────────────────────────────────────────────────────────────────────────────

/// A single document being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    /// Document content
    pub content: String,
    /// Content as last loaded or saved (for detecting modifications)
    saved_content: String,
    /// Name of the uploaded file, if any
    file_name: Option<String>,
    /// Base name for exported files
    export_base: String,
    /// Export base used while the template is loaded
    template_base: String,
    /// Render options shared by preview and HTML export
    options: MarkdownOptions,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Create a session holding the default template.
    pub fn new() -> Self {
        Self {
            content: DEFAULT_TEMPLATE.to_string(),
            saved_content: DEFAULT_TEMPLATE.to_string(),
            file_name: None,
            export_base: TEMPLATE_EXPORT_BASE.to_string(),
            template_base: TEMPLATE_EXPORT_BASE.to_string(),
            options: MarkdownOptions::default(),
        }
    }

    /// Create a session configured from user settings: render options and
    /// the export base for the template.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_options(settings.markdown_options())
            .with_template_base(&settings.export_base_name)
    }

    /// Use these render options for preview and export.
    pub fn with_options(mut self, options: MarkdownOptions) -> Self {
        self.options = options;
        self
    }

    /// Export base to use while no file is uploaded; blank names are ignored.
    pub fn with_template_base(mut self, base: &str) -> Self {
        let base = base.trim();
        if !base.is_empty() {
            if self.file_name.is_none() {
                self.export_base = base.to_string();
            }
            self.template_base = base.to_string();
        }
        self
    }

    /// Replace the buffer with an uploaded file.
    ///
    /// The upload becomes the saved baseline, and the export base is the
    /// file name without a trailing `.md`.
    pub fn load_uploaded(&mut self, file_name: &str, content: String) {
        info!("Loaded upload '{}' ({} bytes)", file_name, content.len());
        self.export_base = export_base_for(file_name);
        self.file_name = Some(file_name.to_string());
        self.saved_content = content.clone();
        self.content = content;
    }

    /// Discard the current document and go back to the template.
    pub fn reset(&mut self) {
        debug!("Resetting session to the default template");
        let options = self.options.clone();
        let template_base = std::mem::take(&mut self.template_base);
        *self = Self::new()
            .with_options(options)
            .with_template_base(&template_base);
    }

    /// Whether the buffer differs from what was loaded or last saved.
    pub fn has_unsaved_changes(&self) -> bool {
        self.content != self.saved_content
    }

    /// Mark the current content as saved.
    pub fn mark_saved(&mut self) {
        self.saved_content = self.content.clone();
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn export_base(&self) -> &str {
        &self.export_base
    }

    /// Override the export base name; blank names are ignored.
    pub fn set_export_base(&mut self, base: &str) {
        let base = base.trim();
        if !base.is_empty() {
            self.export_base = base.to_string();
        }
    }

    /// Apply a toolbar command to the buffer and return the new selection.
    pub fn apply(
        &mut self,
        command: ToolbarCommand,
        selection: SelectionRange,
        supplier: &mut dyn ValueSupplier,
    ) -> FormatResult {
        let result = apply_format(&self.content, selection, &command.action(), supplier);
        if result.applied {
            self.content.clone_from(&result.text);
        }
        result
    }

    /// Render the buffer for preview.
    pub fn preview_html(&self) -> String {
        render_with(&self.content, &self.options)
    }

    /// Export the buffer. Exporting Markdown counts as saving it.
    pub fn export(&mut self, format: ExportFormat) -> ExportArtifact {
        let artifact = export_document_with(&self.content, &self.export_base, format, &self.options);
        if format == ExportFormat::Markdown {
            self.mark_saved();
        }
        artifact
    }
}

/// Export base name for an uploaded file name.
fn export_base_for(file_name: &str) -> String {
    let has_md_suffix = file_name.len() >= 3
        && file_name.is_char_boundary(file_name.len() - 3)
        && file_name[file_name.len() - 3..].eq_ignore_ascii_case(".md");

    let stem = if has_md_suffix {
        &file_name[..file_name.len() - 3]
    } else {
        file_name
    };

    if stem.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        stem.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
