//! List the paths inside uploaded `.zip`, `.tar`, `.tgz` and `.tar.gz`
//! submissions without extracting them.
//!
//! ```no_run
//! # async fn run(bytes: bytes::Bytes) -> subpeek::Result<()> {
//! let result = subpeek::preview_archive("submission.tar.gz", bytes).await?;
//! for entry in &result.entries {
//!     println!("{}{}", entry.path, if entry.is_dir { " (dir)" } else { "" });
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod entry;
pub mod error;
pub mod output;
pub mod preview;

pub use archive::{ArchiveFormat, ArchiveReader, is_supported_archive};
pub use config::PreviewConfig;
pub use entry::{ArchiveEntry, ArchivePreviewResult, ArchiveType, normalize_entries};
pub use error::{PreviewError, Result};
pub use preview::{ArchivePreviewer, preview_archive};
