//! Image storage.

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// A stored file name handed out before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedUpload {
    name: String,
}

impl ReservedUpload {
    /// `<uuid>.<ext>`, with the extension taken from the client's file name.
    pub fn for_client_name(client_name: &str) -> Self {
        let id = Uuid::new_v4();
        let ext = Path::new(client_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                ext.chars()
                    .filter(char::is_ascii_alphanumeric)
                    .take(10)
                    .collect::<String>()
                    .to_ascii_lowercase()
            })
            .filter(|ext| !ext.is_empty());

        let name = match ext {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        };
        Self { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Where uploaded images end up.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Reserve a name for a file; nothing is written yet.
    fn reserve(&self, client_name: &str) -> ReservedUpload {
        ReservedUpload::for_client_name(client_name)
    }

    /// Persist the bytes under the reserved name.
    async fn write(&self, upload: &ReservedUpload, bytes: Bytes) -> ApiResult<()>;

    /// Remove a written file whose record was never stored. Best effort.
    async fn discard(&self, upload: &ReservedUpload);
}

/// Files in a local directory.
pub struct LocalUploadStore {
    root_dir: PathBuf,
}

impl LocalUploadStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn path_of(&self, upload: &ReservedUpload) -> PathBuf {
        self.root_dir.join(upload.name())
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn write(&self, upload: &ReservedUpload, bytes: Bytes) -> ApiResult<()> {
        let io_err = |err: std::io::Error| {
            ApiError::Internal(anyhow::Error::new(err).context("upload write failed"))
        };

        tokio::fs::create_dir_all(&self.root_dir).await.map_err(io_err)?;

        let path = self.path_of(upload);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(io_err)?;
        file.write_all(&bytes).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;

        debug!(file = %upload.name(), size = bytes.len(), "Stored upload");
        Ok(())
    }

    async fn discard(&self, upload: &ReservedUpload) {
        match tokio::fs::remove_file(self.path_of(upload)).await {
            Ok(()) => debug!(file = %upload.name(), "Discarded upload"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(file = %upload.name(), error = %err, "Failed to discard upload"),
        }
    }
}
