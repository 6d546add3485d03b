//! Gzip inflation for `.tgz` / `.tar.gz` / `.gz` uploads.
//!
//! The whole decompressed stream is buffered so the tar decoder can walk it
//! block by block. Output is capped, and a stream that breaks after producing
//! data is kept as-is so the listing can show what came before the damage.

use crate::error::{PreviewError, Result};

#[cfg(feature = "gzip")]
use tracing::warn;

#[cfg(feature = "gzip")]
const INFLATE_CHUNK: usize = 64 * 1024;

/// Inflate a gzip stream into memory, producing at most `limit` bytes
#[cfg(feature = "gzip")]
pub async fn inflate(data: &[u8], limit: u64) -> Result<Vec<u8>> {
    use async_compression::tokio::bufread::GzipDecoder;
    use tokio::io::AsyncReadExt;

    let mut decoder = GzipDecoder::new(data);
    decoder.multiple_members(true);

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut out = Vec::new();
    let mut chunk = vec![0u8; INFLATE_CHUNK];

    loop {
        let n = match decoder.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if out.is_empty() => return Err(PreviewError::Gzip(e)),
            Err(e) => {
                warn!(error = %e, inflated = out.len(), "gzip stream damaged, listing partial contents");
                break;
            }
        };

        let room = limit - out.len();
        if n > room {
            out.extend_from_slice(&chunk[..room]);
            warn!(limit, "decompressed size limit reached, listing partial contents");
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }

    Ok(out)
}

/// Built without gzip support: callers report the archive as unsupported
#[cfg(not(feature = "gzip"))]
pub async fn inflate(_data: &[u8], _limit: u64) -> Result<Vec<u8>> {
    Err(PreviewError::DecompressionUnavailable)
}
