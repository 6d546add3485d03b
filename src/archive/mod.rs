pub mod detect;
pub mod gzip;
pub mod tar;
pub mod zip;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::PreviewConfig;
use crate::entry::ArchiveEntry;
use crate::error::Result;

pub use detect::{ArchiveFormat, is_supported_archive};

/// Trait for listing the entries of one archive format
#[async_trait]
pub trait ArchiveReader: Send + Sync {
    /// Read the archive's entry metadata.
    /// Entries come back in archive order; callers normalize and sort them.
    async fn read_entries(&self, data: Bytes) -> Result<Vec<ArchiveEntry>>;
}

/// Get the reader for a detected format
pub fn reader_for(format: ArchiveFormat, config: &PreviewConfig) -> Box<dyn ArchiveReader> {
    match format {
        ArchiveFormat::Zip => Box::new(zip::ZipReader),
        ArchiveFormat::Tar => Box::new(tar::TarReader::plain()),
        ArchiveFormat::TarGz => Box::new(tar::TarReader::gzipped(config.max_decompressed_size)),
    }
}
