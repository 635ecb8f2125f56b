//! ReadmeGenius
//!
//! A README editor core: a small Markdown-to-HTML renderer shared by the
//! live preview and the HTML export, and a selection-aware formatting
//! transform driven by a toolbar.
//!
//! # Modules
//! - [`markdown`] - Block segmentation, inline formatting, rendering and toolbar actions
//! - [`export`] - Markdown and standalone HTML export
//! - [`state`] - The editor session and default template
//! - [`files`] - Markdown upload validation and export writing
//! - [`config`] - Persisted user settings

pub mod config;
pub mod error;
pub mod export;
pub mod files;
pub mod markdown;
pub mod state;
pub mod string_utils;
