//! Local disk storage for uploaded PDFs.
//!
//! Rows keep the full stored path in `file_path`; this module owns creating,
//! opening, and removing those files.
//!
//! A freshly created file is held by a [`PendingUpload`] guard until its row
//! exists. If the request is abandoned first (an error, a timeout, or a client
//! disconnect dropping the handler future) the guard deletes the file.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};

/// A stored upload that is deleted on drop unless [`PendingUpload::keep`] is
/// called.
#[derive(Debug)]
pub struct PendingUpload {
    path: Option<PathBuf>,
}

impl PendingUpload {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Keep the file on disk, returning its path.
    pub fn keep(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        // Drop cannot await; unlinking one file is cheap enough to do inline.
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "Discarded unfinished upload"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to discard upload");
                }
            }
        }
    }
}

/// Handle to the upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory (and parents) if missing.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Create a new, empty file named `stored_name` inside the directory.
    ///
    /// Fails if the name is already taken rather than overwriting.
    pub async fn create(&self, stored_name: &str) -> io::Result<(PendingUpload, File)> {
        self.ensure_dir().await?;
        let path = self.dir.join(stored_name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        Ok((PendingUpload::new(path), file))
    }

    /// Open a stored file for streaming, returning it with its length.
    ///
    /// Returns `Ok(None)` when the file is missing or is not a regular file.
    pub async fn open(&self, file_path: &str) -> io::Result<Option<(File, u64)>> {
        let metadata = match fs::metadata(file_path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let file = File::open(file_path).await?;
        Ok(Some((file, metadata.len())))
    }

    /// Delete a stored file. Failures are logged and swallowed: the caller's
    /// database change has already happened and must not be rolled back.
    pub async fn remove_best_effort(&self, file_path: impl AsRef<Path>) {
        let path = file_path.as_ref();
        match fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed stored file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Stored file already missing");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[tokio::test]
    async fn create_open_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().join("nested"));

        let (pending, mut file) = store.create("a.pdf").await.unwrap();
        file.write_all(b"%PDF-1.7").await.unwrap();
        file.flush().await.unwrap();
        drop(file);
        let path = pending.keep();

        let path_str = path.to_string_lossy().to_string();
        let (_, len) = store.open(&path_str).await.unwrap().unwrap();
        assert_eq!(len, 8);

        store.remove_best_effort(&path).await;
        assert!(store.open(&path_str).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        store.create("dup.pdf").await.unwrap();
        assert!(store.create("dup.pdf").await.is_err());
    }

    #[tokio::test]
    async fn dropped_upload_is_deleted() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let (pending, mut file) = store.create("partial.pdf").await.unwrap();
        file.write_all(b"%PDF-1.").await.unwrap();
        let path = pending.path().to_path_buf();
        assert!(path.exists());

        drop(pending);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn kept_upload_survives() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let (pending, _file) = store.create("kept.pdf").await.unwrap();
        let path = pending.keep();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn removing_a_missing_file_does_not_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        store.remove_best_effort(tmp.path().join("ghost.pdf")).await;
    }
}
