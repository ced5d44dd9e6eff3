//! Text/image acquisition collaborator boundary.
//!
//! Acquisition is best-effort by contract: unreadable input yields empty
//! text rather than failing the pipeline, and preview images are
//! optional. OCR and PDF rendering live behind this trait; the bundled
//! implementation covers plain-text files only.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// What acquisition produced for one document.
#[derive(Debug, Default)]
pub struct Acquired {
    pub text: String,
    /// Rendered page previews, capped in count. Temporary files — the
    /// orchestrator owns their cleanup via [`PreviewGuard`].
    pub preview_images: Vec<PathBuf>,
}

pub trait TextSource: Send + Sync {
    fn acquire(&self, path: &Path) -> Acquired;
}

/// Plain filesystem source: reads the file as (lossy) UTF-8 text.
/// Formats that need OCR or rendering yield empty text here and are the
/// concern of a richer collaborator.
pub struct FsTextSource;

impl TextSource for FsTextSource {
    fn acquire(&self, path: &Path) -> Acquired {
        let text = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Text acquisition failed; continuing with empty text");
                String::new()
            }
        };
        Acquired {
            text,
            preview_images: Vec::new(),
        }
    }
}

/// Owns temporary preview images for one pipeline run and deletes them
/// on drop, covering every exit path including the failure branch.
pub struct PreviewGuard {
    paths: Vec<PathBuf>,
}

impl PreviewGuard {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for PreviewGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(e) = fs::remove_file(path) {
                tracing::debug!(path = %path.display(), error = %e, "Preview cleanup skipped");
            }
        }
    }
}

/// Encode preview images as base64 for multimodal capability calls.
/// Best-effort: unreadable files are skipped, count is capped.
pub fn encode_preview_images(paths: &[PathBuf], max_images: usize) -> Vec<String> {
    paths
        .iter()
        .take(max_images)
        .filter_map(|p| match fs::read(p) {
            Ok(bytes) => Some(STANDARD.encode(&bytes)),
            Err(e) => {
                tracing::debug!(path = %p.display(), error = %e, "Skipping unreadable preview image");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_source_reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "Scheduling Order: hearing set for 01/10/2026").unwrap();

        let acquired = FsTextSource.acquire(&path);
        assert!(acquired.text.contains("Scheduling Order"));
        assert!(acquired.preview_images.is_empty());
    }

    #[test]
    fn fs_source_missing_file_yields_empty_text() {
        let acquired = FsTextSource.acquire(Path::new("/nonexistent/file.txt"));
        assert!(acquired.text.is_empty());
    }

    #[test]
    fn preview_guard_removes_files_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page_1.png");
        fs::write(&path, b"fake png").unwrap();

        {
            let _guard = PreviewGuard::new(vec![path.clone()]);
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn encode_caps_image_count_and_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        fs::write(&a, b"aa").unwrap();
        fs::write(&b, b"bb").unwrap();
        let missing = dir.path().join("missing.png");

        // a is encoded, missing is skipped, b falls beyond the cap
        let encoded = encode_preview_images(&[a, missing, b], 2);
        assert_eq!(encoded.len(), 1);
        assert_eq!(encoded[0], "YWE=");
    }
}
