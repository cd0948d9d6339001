//! Filesystem-level storage for uploaded image files.
//!
//! Uploaded files land under the media root at `images/<name>/<filename>`,
//! a pure function of the record name and the original upload filename.
//! Two records that share a name and upload a same-named file therefore
//! collide on the same path; the later write overwrites the earlier one.

use std::path::{Path, PathBuf};

use imagestore_common::{Error, Result};

/// Filesystem manager for uploaded image files.
///
/// Constructed from the configured media root and carried in the server
/// context; no global state is involved.
pub struct MediaStore {
    media_root: PathBuf,
}

impl MediaStore {
    /// Create a new `MediaStore` rooted at the given directory.
    pub fn new(media_root: PathBuf) -> Self {
        Self { media_root }
    }

    /// The configured media root directory.
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Compute the storage path for an upload, relative to the media root.
    ///
    /// The shape is `images/<name>/<filename>`. Both segments are rejected
    /// if they are empty or would escape the media root.
    pub fn relative_path(name: &str, filename: &str) -> Result<String> {
        validate_segment(name)?;
        validate_segment(filename)?;
        Ok(format!("images/{}/{}", name, filename))
    }

    /// Resolve a relative path against the media root.
    pub fn absolute_path(&self, relative: &str) -> PathBuf {
        self.media_root.join(relative)
    }

    /// Write uploaded bytes to the computed path.
    ///
    /// Creates parent directories as needed and returns the relative path
    /// of the stored file. An existing file at the same path is silently
    /// overwritten.
    pub fn store(&self, name: &str, filename: &str, data: &[u8]) -> Result<String> {
        let relative = Self::relative_path(name, filename)?;
        let path = self.absolute_path(&relative);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, data)?;

        Ok(relative)
    }
}

/// Reject path segments that are empty or could escape the media root.
fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::invalid_input("path segment cannot be empty"));
    }
    if segment == "." || segment == ".." {
        return Err(Error::invalid_input(format!(
            "invalid path segment: {}",
            segment
        )));
    }
    if segment.contains('/') || segment.contains('\\') {
        return Err(Error::invalid_input(format!(
            "path segment contains a separator: {}",
            segment
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_shape() {
        let path = MediaStore::relative_path("cat", "pic.png").unwrap();
        assert_eq!(path, "images/cat/pic.png");
    }

    #[test]
    fn test_relative_path_rejects_separators() {
        assert!(MediaStore::relative_path("a/b", "pic.png").is_err());
        assert!(MediaStore::relative_path("cat", "a\\b.png").is_err());
    }

    #[test]
    fn test_relative_path_rejects_dot_segments() {
        assert!(MediaStore::relative_path("..", "pic.png").is_err());
        assert!(MediaStore::relative_path("cat", "..").is_err());
        assert!(MediaStore::relative_path(".", "pic.png").is_err());
    }

    #[test]
    fn test_relative_path_rejects_empty() {
        assert!(MediaStore::relative_path("", "pic.png").is_err());
        assert!(MediaStore::relative_path("cat", "").is_err());
    }

    #[test]
    fn test_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf());

        let relative = store.store("cat", "pic.png", b"png bytes").unwrap();
        assert_eq!(relative, "images/cat/pic.png");

        let written = std::fs::read(store.absolute_path(&relative)).unwrap();
        assert_eq!(written, b"png bytes");
    }

    #[test]
    fn test_store_overwrites_colliding_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf());

        store.store("cat", "pic.png", b"first").unwrap();
        let relative = store.store("cat", "pic.png", b"second").unwrap();

        let written = std::fs::read(store.absolute_path(&relative)).unwrap();
        assert_eq!(written, b"second");
    }
}
