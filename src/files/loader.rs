//! Markdown file loading and export writing
//!
//! Uploads are accepted only when the file name carries a Markdown
//! extension; anything else is rejected before its content is read.

use crate::error::{Error, Result};
use crate::export::ExportArtifact;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions accepted as Markdown (compared case-insensitively).
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];

/// Whether `path` has a Markdown file extension.
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Read a Markdown file, returning its file name and content.
///
/// Returns [`Error::InvalidFileType`] without touching the file when the
/// extension is not a Markdown one.
pub fn load_markdown_file(path: &Path) -> Result<(String, String)> {
    if !is_markdown_file(path) {
        warn!("Rejected non-Markdown file: {}", path.display());
        return Err(Error::InvalidFileType {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!("Loaded {} ({} bytes)", path.display(), content.len());
    Ok((name, content))
}

/// Write an export artifact into `dir`, creating the directory if needed.
///
/// Returns the full path of the written file.
pub fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::FileWrite {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.content).map_err(|e| Error::FileWrite {
        path: path.clone(),
        source: e,
    })?;

    info!("Wrote {} ({})", path.display(), artifact.mime_type);
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{export_document, ExportFormat};
    use tempfile::TempDir;

    #[test]
    fn test_markdown_extensions() {
        assert!(is_markdown_file(Path::new("README.md")));
        assert!(is_markdown_file(Path::new("README.MD")));
        assert!(is_markdown_file(Path::new("docs/guide.markdown")));
        assert!(is_markdown_file(Path::new("a.mkdn")));
        assert!(!is_markdown_file(Path::new("notes.txt")));
        assert!(!is_markdown_file(Path::new("README")));
        assert!(!is_markdown_file(Path::new("md")));
    }

    #[test]
    fn test_load_markdown_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Guide.md");
        fs::write(&path, "# Guide\n").unwrap();

        let (name, content) = load_markdown_file(&path).unwrap();
        assert_eq!(name, "Guide.md");
        assert_eq!(content, "# Guide\n");
    }

    #[test]
    fn test_load_rejects_other_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{}").unwrap();

        let err = load_markdown_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidFileType { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_markdown_file(&dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_write_artifact_creates_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        let artifact = export_document("# Hi", "README", ExportFormat::Html);

        let path = write_artifact(&out, &artifact).unwrap();
        assert_eq!(path, out.join("README.html"));
        assert!(fs::read_to_string(path).unwrap().contains("<h1>Hi</h1>"));
    }
}
