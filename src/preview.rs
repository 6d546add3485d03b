use bytes::Bytes;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::archive::{ArchiveFormat, reader_for};
use crate::config::PreviewConfig;
use crate::entry::ArchivePreviewResult;
use crate::error::{PreviewError, Result};

/// Lists uploaded archives without extracting them
#[derive(Debug, Clone, Default)]
pub struct ArchivePreviewer {
    config: PreviewConfig,
}

impl ArchivePreviewer {
    pub fn new(config: PreviewConfig) -> Self {
        ArchivePreviewer { config }
    }

    /// Preview an in-memory archive.
    ///
    /// `name` is only used to pick the format. Unrecognized extensions, and
    /// gzip archives when decompression is unavailable, give an
    /// `Unsupported` result rather than an error.
    pub async fn preview(&self, name: &str, data: Bytes) -> Result<ArchivePreviewResult> {
        let Some(format) = ArchiveFormat::from_name(name) else {
            debug!(name, "unrecognized archive extension");
            return Ok(ArchivePreviewResult::unsupported());
        };

        debug!(name, ?format, size = data.len(), "previewing archive");
        let reader = reader_for(format, &self.config);
        match reader.read_entries(data).await {
            Ok(entries) => Ok(ArchivePreviewResult::new(format.archive_type(), entries)),
            Err(PreviewError::DecompressionUnavailable) => {
                debug!(name, "gzip support not available");
                Ok(ArchivePreviewResult::unsupported())
            }
            Err(e) => Err(e),
        }
    }

    /// Buffer an async source into memory, then preview it
    pub async fn preview_reader<R>(&self, name: &str, reader: R) -> Result<ArchivePreviewResult>
    where
        R: AsyncRead + Unpin + Send,
    {
        // Unsupported names never need their bytes
        if ArchiveFormat::from_name(name).is_none() {
            return Ok(ArchivePreviewResult::unsupported());
        }

        let limit = self.config.max_archive_size;
        let mut buffer = Vec::new();
        reader
            .take(limit.saturating_add(1))
            .read_to_end(&mut buffer)
            .await?;

        if buffer.len() as u64 > limit {
            return Err(PreviewError::TooLarge { limit });
        }

        self.preview(name, Bytes::from(buffer)).await
    }

    /// Open a file and preview it, dispatching on its file name
    pub async fn preview_file(&self, path: impl AsRef<Path>) -> Result<ArchivePreviewResult> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.preview_file_as(path, &name).await
    }

    /// Open a file and preview it, dispatching on `name` instead of the path
    pub async fn preview_file_as(
        &self,
        path: impl AsRef<Path>,
        name: &str,
    ) -> Result<ArchivePreviewResult> {
        let file = tokio::fs::File::open(path).await?;
        self.preview_reader(name, file).await
    }
}

/// Preview an in-memory archive with the default limits
pub async fn preview_archive(name: &str, data: Bytes) -> Result<ArchivePreviewResult> {
    ArchivePreviewer::default().preview(name, data).await
}
