// Local filesystem adapter - File operations around an export

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::{ExportError, ExportResult};
use crate::ports::*;

/// Prefix of staged source files; hidden on Unix
const STAGE_PREFIX: &str = ".splitclip-src-";

/// Filesystem adapter backed by `tokio::fs`
#[derive(Debug, Default, Clone)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn remove_file(&self, path: &Path) -> ExportResult<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ExportError::io(path, e)),
        }
    }

    async fn stage_source(&self, path: &Path) -> ExportResult<StagedSource> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        // Reserve a unique name in the same directory so the rename stays on one volume
        let reserved = tempfile::Builder::new()
            .prefix(STAGE_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&dir)
            .map_err(|e| ExportError::io(&dir, format!("Failed to reserve staging file: {}", e)))?
            .into_temp_path();

        tokio::fs::rename(path, &reserved)
            .await
            .map_err(|e| ExportError::io(path, format!("Failed to stage source: {}", e)))?;

        let staged = reserved
            .keep()
            .map_err(|e| ExportError::io(path, format!("Failed to keep staged source: {}", e)))?;

        Ok(StagedSource { path: staged })
    }

    async fn restore_source(&self, staged: &StagedSource, original: &Path) -> ExportResult<()> {
        tokio::fs::rename(&staged.path, original)
            .await
            .map_err(|e| ExportError::io(original, format!("Failed to restore source: {}", e)))
    }

    async fn discard_staged(&self, staged: &StagedSource) -> ExportResult<()> {
        self.remove_file(&staged.path).await.map(|_| ())
    }
}
