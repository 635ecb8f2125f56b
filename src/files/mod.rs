//! File operations module for ReadmeGenius
//!
//! This module validates and loads Markdown uploads and writes export
//! artifacts to disk.

pub mod loader;

pub use loader::{is_markdown_file, load_markdown_file, write_artifact, MARKDOWN_EXTENSIONS};
