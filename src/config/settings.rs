//! User settings and preferences for ReadmeGenius
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::export::ExportFormat;
use crate::markdown::{MarkdownOptions, ValuePrompt};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User settings, persisted as JSON.
///
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Export
    /// Base name used for exports of the default template
    pub export_base_name: String,

    /// Format used when none is given on the command line
    pub default_export_format: ExportFormat,

    /// Directory exports are written to (current directory when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_directory: Option<PathBuf>,

    // Toolbar prompts
    /// Pre-filled answer for the link URL prompt
    pub default_link_url: String,

    /// Pre-filled answer for the image URL prompt
    pub default_image_url: String,

    // Rendering
    /// Neutralize `javascript:`-style URLs in links and images
    pub safe_urls: bool,

    // Recent files
    /// Recently opened files, most recent first
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_base_name: Self::DEFAULT_EXPORT_BASE.to_string(),
            default_export_format: ExportFormat::default(),
            export_directory: None,
            default_link_url: ValuePrompt::LINK_URL.default.to_string(),
            default_image_url: ValuePrompt::IMAGE_URL.default.to_string(),
            safe_urls: true,
            recent_files: Vec::new(),
            max_recent_files: 10,
        }
    }
}

impl Settings {
    /// Export base name for the built-in template.
    pub const DEFAULT_EXPORT_BASE: &'static str = "README_Template";
    /// Upper bound for `max_recent_files`.
    pub const MAX_RECENT_FILES: usize = 100;

    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Render options derived from these settings.
    pub fn markdown_options(&self) -> MarkdownOptions {
        MarkdownOptions {
            safe_urls: self.safe_urls,
        }
    }

    /// The pre-filled answer for a toolbar prompt.
    pub fn prompt_default(&self, prompt: &ValuePrompt) -> &str {
        if *prompt == ValuePrompt::IMAGE_URL {
            &self.default_image_url
        } else if *prompt == ValuePrompt::LINK_URL {
            &self.default_link_url
        } else {
            prompt.default
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Sanitize settings after loading a hand-edited file.
    pub fn sanitize(&mut self) {
        let base = self.export_base_name.trim();
        self.export_base_name = if base.is_empty() || base.contains(['/', '\\']) {
            Self::DEFAULT_EXPORT_BASE.to_string()
        } else {
            base.to_string()
        };

        if self.default_link_url.trim().is_empty() {
            self.default_link_url = ValuePrompt::LINK_URL.default.to_string();
        }
        if self.default_image_url.trim().is_empty() {
            self.default_image_url = ValuePrompt::IMAGE_URL.default.to_string();
        }

        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > Self::MAX_RECENT_FILES {
            self.max_recent_files = Self::MAX_RECENT_FILES;
        }

        // Keep the first occurrence of each path
        let mut seen = Vec::with_capacity(self.recent_files.len());
        self.recent_files.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
