use serde::Deserialize;

/// Largest input archive buffered for a preview (64 MiB)
pub const DEFAULT_MAX_ARCHIVE_SIZE: u64 = 64 * 1024 * 1024;

/// Largest decompressed tar stream inflated from a gzip archive (256 MiB)
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: u64 = 256 * 1024 * 1024;

/// Limits applied while previewing an archive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Upper bound on the bytes read from an input source
    pub max_archive_size: u64,
    /// Upper bound on the bytes produced by gzip inflation; the tar listing
    /// stops at this point
    pub max_decompressed_size: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            max_archive_size: DEFAULT_MAX_ARCHIVE_SIZE,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }
}

impl PreviewConfig {
    pub fn with_max_archive_size(mut self, bytes: u64) -> Self {
        self.max_archive_size = bytes;
        self
    }

    pub fn with_max_decompressed_size(mut self, bytes: u64) -> Self {
        self.max_decompressed_size = bytes;
        self
    }
}
