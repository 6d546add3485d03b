use thiserror::Error;

/// Errors that can stop a preview.
///
/// Damage found after decoding has started (truncated tar blocks, a gzip
/// stream cut off midway) is not an error: the readers return what they
/// managed to list. Only containers that cannot be opened at all end up here.
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Failed to read ZIP central directory: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Input is not a valid gzip stream: {0}")]
    Gzip(#[source] std::io::Error),

    /// Gzip support was not compiled in. The previewer reports these
    /// archives as unsupported instead of surfacing this variant.
    #[error("Gzip decompression is not available in this build")]
    DecompressionUnavailable,

    #[error("Archive exceeds the {limit} byte preview limit")]
    TooLarge { limit: u64 },

    #[error("Failed to read archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to join blocking task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PreviewError>;
