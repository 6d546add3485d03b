use async_trait::async_trait;
use bytes::Bytes;
use std::io::Cursor;
use tracing::debug;
use zip::ZipArchive;

use crate::entry::ArchiveEntry;
use crate::error::Result;

use super::ArchiveReader;

/// Lists ZIP archives from their central directory
pub struct ZipReader;

#[async_trait]
impl ArchiveReader for ZipReader {
    async fn read_entries(&self, data: Bytes) -> Result<Vec<ArchiveEntry>> {
        // The zip crate reads synchronously; keep it off the async workers
        let entries = tokio::task::spawn_blocking(move || list_entries(&data)).await??;
        debug!(count = entries.len(), "listed zip entries");
        Ok(entries)
    }
}

/// Enumerate the central directory without decompressing any entry
pub fn list_entries(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        entries.push(ArchiveEntry::new(file.name().replace('\\', "/"), file.is_dir()));
    }

    Ok(entries)
}
