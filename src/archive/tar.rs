use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::entry::ArchiveEntry;
use crate::error::Result;

use super::{ArchiveReader, gzip};

pub const TAR_BLOCK: usize = 512;

const NAME_FIELD: std::ops::Range<usize> = 0..100;
const SIZE_FIELD: std::ops::Range<usize> = 124..136;
const TYPEFLAG_OFFSET: usize = 156;
const TYPEFLAG_DIRECTORY: u8 = b'5';

/// Lists tar archives, optionally gzip-wrapped
pub struct TarReader {
    gzip: bool,
    max_decompressed_size: u64,
}

impl TarReader {
    pub fn plain() -> Self {
        TarReader {
            gzip: false,
            max_decompressed_size: u64::MAX,
        }
    }

    pub fn gzipped(max_decompressed_size: u64) -> Self {
        TarReader {
            gzip: true,
            max_decompressed_size,
        }
    }
}

#[async_trait]
impl ArchiveReader for TarReader {
    async fn read_entries(&self, data: Bytes) -> Result<Vec<ArchiveEntry>> {
        let entries = if self.gzip {
            let raw = gzip::inflate(&data, self.max_decompressed_size).await?;
            debug!(compressed = data.len(), inflated = raw.len(), "inflated gzip stream");
            decode_entries(&raw)
        } else {
            decode_entries(&data)
        };
        debug!(count = entries.len(), "listed tar entries");
        Ok(entries)
    }
}

/// Bounds-checked walk over a buffer in 512-byte blocks
pub struct BlockCursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> BlockCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        BlockCursor { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Take the next full block, or `None` if fewer than 512 bytes remain
    pub fn next_block(&mut self) -> Option<&'a [u8; TAR_BLOCK]> {
        let end = self.offset.checked_add(TAR_BLOCK)?;
        let block: &'a [u8; TAR_BLOCK] = self.buf.get(self.offset..end)?.try_into().ok()?;
        self.offset = end;
        Some(block)
    }

    /// Skip `len` bytes rounded up to whole blocks. Skipping past the end
    /// exhausts the cursor.
    pub fn skip_padded(&mut self, len: u64) {
        let next = usize::try_from(round_up_512(len))
            .ok()
            .and_then(|n| self.offset.checked_add(n));
        self.offset = match next {
            Some(next) if next <= self.buf.len() => next,
            _ => self.buf.len(),
        };
    }
}

/// Borrowed view of one tar header block
pub struct TarHeader<'a> {
    block: &'a [u8; TAR_BLOCK],
}

impl<'a> TarHeader<'a> {
    pub fn new(block: &'a [u8; TAR_BLOCK]) -> Self {
        TarHeader { block }
    }

    /// An all-zero block marks the end of the archive
    pub fn is_end_marker(&self) -> bool {
        self.block.iter().all(|&b| b == 0)
    }

    /// Entry name from the 100-byte name field. The ustar prefix field is
    /// not consulted.
    pub fn name(&self) -> String {
        parse_cstr(&self.block[NAME_FIELD])
    }

    /// Content size in bytes; 0 when the field is empty or not octal
    pub fn size(&self) -> u64 {
        parse_octal_u64(&self.block[SIZE_FIELD]).unwrap_or(0)
    }

    pub fn typeflag(&self) -> u8 {
        self.block[TYPEFLAG_OFFSET]
    }

    /// Symlinks, hard links and PAX headers all come back as files.
    pub fn is_dir(&self, name: &str) -> bool {
        self.typeflag() == TYPEFLAG_DIRECTORY || name.ends_with('/')
    }
}

/// Walk an uncompressed tar buffer and collect its entries.
///
/// Stops at the first all-zero block (not the pair POSIX asks for) or when
/// no full block remains. Never fails: a truncated buffer returns whatever
/// was listed before the cut.
pub fn decode_entries(buf: &[u8]) -> Vec<ArchiveEntry> {
    let mut cursor = BlockCursor::new(buf);
    let mut entries = Vec::new();

    while let Some(block) = cursor.next_block() {
        let header = TarHeader::new(block);
        if header.is_end_marker() {
            debug!(offset = cursor.offset() - TAR_BLOCK, "reached end-of-archive block");
            break;
        }

        let name = header.name();
        let is_dir = header.is_dir(&name);
        let size = header.size();

        if !name.is_empty() {
            entries.push(ArchiveEntry::new(name, is_dir));
        }

        cursor.skip_padded(size);
    }

    entries
}

/// Parse a null-terminated C string from a tar header field
fn parse_cstr(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).trim_end().to_string()
}

/// Parse an octal number from a tar header field.
/// Leading spaces are skipped; the numeral ends at the first NUL or space.
fn parse_octal_u64(field: &[u8]) -> Option<u64> {
    let start = field.iter().position(|&b| b != b' ').unwrap_or(field.len());
    let digits = &field[start..];
    let end = digits
        .iter()
        .position(|&b| b == 0 || b == b' ')
        .unwrap_or(digits.len());
    let s = String::from_utf8_lossy(&digits[..end]);
    if s.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(&s, 8).ok()
}

/// Round up to next 512-byte boundary
fn round_up_512(n: u64) -> u64 {
    n.div_ceil(TAR_BLOCK as u64).saturating_mul(TAR_BLOCK as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str, size: u64, typeflag: u8) -> Vec<u8> {
        let mut block = vec![0u8; TAR_BLOCK];
        block[..name.len()].copy_from_slice(name.as_bytes());
        let size = format!("{size:011o}\0");
        block[124..136].copy_from_slice(size.as_bytes());
        block[156] = typeflag;
        block
    }

    fn content(len: usize) -> Vec<u8> {
        let mut data = vec![b'x'; len];
        data.resize(round_up_512(len as u64) as usize, 0);
        data
    }

    #[test]
    fn test_parse_cstr() {
        assert_eq!(parse_cstr(b"test.txt\0\0\0\0"), "test.txt");
        assert_eq!(parse_cstr(b"test\0"), "test");
        assert_eq!(parse_cstr(b"\0\0\0\0"), "");
        assert_eq!(parse_cstr(b"trailing  \0"), "trailing");
    }

    #[test]
    fn test_parse_octal_u64() {
        assert_eq!(parse_octal_u64(b"0000644\0"), Some(420));
        assert_eq!(parse_octal_u64(b"\0\0\0\0"), Some(0));
        assert_eq!(parse_octal_u64(b"0000144\0"), Some(100));
        assert_eq!(parse_octal_u64(b"04000000\0"), Some(1048576));
        assert_eq!(parse_octal_u64(b"    17 \0"), Some(15));
        assert_eq!(parse_octal_u64(b"        "), Some(0));
        assert_eq!(parse_octal_u64(b"0000089\0"), None);
        assert_eq!(parse_octal_u64(b"0000017 0000"), Some(15));
        assert_eq!(parse_octal_u64(b"17\0garbage99"), Some(15));
    }

    #[test]
    fn test_round_up_512() {
        assert_eq!(round_up_512(0), 0);
        assert_eq!(round_up_512(1), 512);
        assert_eq!(round_up_512(512), 512);
        assert_eq!(round_up_512(513), 1024);
        assert_eq!(round_up_512(1000), 1024);
        assert_eq!(round_up_512(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_cursor_stops_on_partial_block() {
        let buf = vec![1u8; TAR_BLOCK + 100];
        let mut cursor = BlockCursor::new(&buf);
        assert!(cursor.next_block().is_some());
        assert!(cursor.next_block().is_none());
        assert_eq!(cursor.offset(), TAR_BLOCK);
    }

    #[test]
    fn test_cursor_skip_past_end() {
        let buf = vec![1u8; TAR_BLOCK * 2];
        let mut cursor = BlockCursor::new(&buf);
        cursor.skip_padded(u64::MAX);
        assert!(cursor.next_block().is_none());
    }

    #[test]
    fn test_decode_file_and_dir() {
        let mut buf = header("a.txt", 5, b'0');
        buf.extend(content(5));
        buf.extend(header("sub/", 0, b'5'));
        buf.extend(vec![0u8; TAR_BLOCK * 2]);

        let entries = decode_entries(&buf);
        assert_eq!(
            entries,
            vec![ArchiveEntry::file("a.txt"), ArchiveEntry::dir("sub/")]
        );
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_entries(&[]).is_empty());
        assert!(decode_entries(&[0u8; TAR_BLOCK * 2]).is_empty());
    }

    #[test]
    fn test_single_zero_block_ends_archive() {
        let mut buf = header("first.txt", 0, b'0');
        buf.extend(vec![0u8; TAR_BLOCK]);
        buf.extend(header("hidden.txt", 0, b'0'));

        let entries = decode_entries(&buf);
        assert_eq!(entries, vec![ArchiveEntry::file("first.txt")]);
    }

    #[test]
    fn test_truncated_mid_header() {
        let mut buf = header("a.txt", 5, b'0');
        buf.extend(content(5));
        buf.extend(&header("b.txt", 5, b'0')[..200]);

        let entries = decode_entries(&buf);
        assert_eq!(entries, vec![ArchiveEntry::file("a.txt")]);
    }

    #[test]
    fn test_size_past_end_of_buffer() {
        let mut buf = header("big.bin", 10 * 1024 * 1024, b'0');
        buf.extend(content(100));

        let entries = decode_entries(&buf);
        assert_eq!(entries, vec![ArchiveEntry::file("big.bin")]);
    }

    #[test]
    fn test_trailing_slash_is_dir() {
        let mut buf = header("docs/", 0, b'0');
        buf.extend(header("plain", 0, 0));

        let entries = decode_entries(&buf);
        assert_eq!(
            entries,
            vec![ArchiveEntry::dir("docs/"), ArchiveEntry::file("plain")]
        );
    }

    #[test]
    fn test_other_typeflags_are_files() {
        let mut buf = header("link", 0, b'2');
        buf.extend(header("hard", 0, b'1'));
        buf.extend(header("PaxHeaders/x", 20, b'x'));
        buf.extend(content(20));

        let entries = decode_entries(&buf);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.is_dir));
    }

    #[test]
    fn test_empty_name_skipped_but_advances() {
        let mut buf = header("", 600, b'0');
        buf.extend(content(600));
        buf.extend(header("after.txt", 0, b'0'));

        let entries = decode_entries(&buf);
        assert_eq!(entries, vec![ArchiveEntry::file("after.txt")]);
    }

    #[test]
    fn test_unparseable_size_treated_as_zero() {
        let mut first = header("bad.txt", 0, b'0');
        first[124..136].copy_from_slice(b"zzzzzzzzzzz\0");
        let mut buf = first;
        buf.extend(header("next.txt", 0, b'0'));

        let entries = decode_entries(&buf);
        assert_eq!(
            entries,
            vec![ArchiveEntry::file("bad.txt"), ArchiveEntry::file("next.txt")]
        );
    }

    #[test]
    fn test_space_terminated_size_with_trailing_bytes() {
        let mut first = header("a.txt", 0, b'0');
        first[124..136].copy_from_slice(b"0001000 0000");
        let mut buf = first;
        buf.extend(content(512));
        buf.extend(header("b.txt", 0, b'0'));

        let entries = decode_entries(&buf);
        assert_eq!(
            entries,
            vec![ArchiveEntry::file("a.txt"), ArchiveEntry::file("b.txt")]
        );
    }

    #[test]
    fn test_prefix_field_ignored() {
        let mut block = header("file.txt", 0, b'0');
        block[345..353].copy_from_slice(b"longpath");

        let entries = decode_entries(&block);
        assert_eq!(entries, vec![ArchiveEntry::file("file.txt")]);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let mut buf = header("a.txt", 5, b'0');
        buf.extend(content(5));
        buf.extend(header("sub/", 0, b'5'));

        assert_eq!(decode_entries(&buf), decode_entries(&buf));
    }

    #[tokio::test]
    async fn test_plain_reader() {
        let mut buf = header("sub/", 0, b'5');
        buf.extend(header("sub/a.txt", 3, b'0'));
        buf.extend(content(3));

        let entries = TarReader::plain()
            .read_entries(Bytes::from(buf))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }
}
