//! Uploaded files: declared metadata plus an asynchronously readable body

use super::classify::mime_type_for_path;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The raw bytes behind an upload, read once per ingestion attempt.
#[async_trait]
pub trait FileBody: Send + Sync {
    async fn read_bytes(&self) -> std::io::Result<Vec<u8>>;
}

/// Body already held in memory (pasted text, browser blobs).
#[derive(Debug, Clone)]
pub struct InMemoryBody(Vec<u8>);

impl InMemoryBody {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }
}

#[async_trait]
impl FileBody for InMemoryBody {
    async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

/// Body backed by a file on disk.
#[derive(Debug, Clone)]
pub struct PathBody(PathBuf);

impl PathBody {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

#[async_trait]
impl FileBody for PathBody {
    async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.0).await
    }
}

/// A single file selected for ingestion.
#[derive(Clone)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: String,
    body: Arc<dyn FileBody>,
}

impl FileUpload {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        body: impl FileBody + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            body: Arc::new(body),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(name, mime_type, InMemoryBody::new(bytes))
    }

    /// Upload a local file, deriving the MIME type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(name, mime_type_for_path(path), PathBody::new(path))
    }

    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        self.body.read_bytes().await
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn path_upload_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terv.md");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"# Terv")
            .unwrap();

        let upload = FileUpload::from_path(&path);
        assert_eq!(upload.name, "terv.md");
        assert_eq!(upload.mime_type, "text/markdown");
        assert_eq!(upload.read_bytes().await.unwrap(), b"# Terv");
    }

    #[tokio::test]
    async fn missing_file_fails_on_read_not_on_construction() {
        let dir = tempfile::tempdir().unwrap();
        let upload = FileUpload::from_path(dir.path().join("missing.pdf"));
        assert_eq!(upload.mime_type, "application/pdf");
        assert!(upload.read_bytes().await.is_err());
    }
}
