use serde::Serialize;
use std::cmp::Ordering;

/// Kind of archive reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveType {
    Zip,
    Tar,
    Unsupported,
}

/// A single path recorded inside an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub path: String,
    pub is_dir: bool,
}

impl ArchiveEntry {
    pub fn new(path: impl Into<String>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, false)
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path, true)
    }
}

/// Display order: directories first, then byte-wise path order.
impl Ord for ArchiveEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_dir
            .cmp(&self.is_dir)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for ArchiveEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of previewing one archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivePreviewResult {
    #[serde(rename = "type")]
    pub archive_type: ArchiveType,
    pub entries: Vec<ArchiveEntry>,
}

impl ArchivePreviewResult {
    /// Build a result, normalizing and ordering the raw entries
    pub fn new(archive_type: ArchiveType, entries: Vec<ArchiveEntry>) -> Self {
        if archive_type == ArchiveType::Unsupported {
            return Self::unsupported();
        }
        Self {
            archive_type,
            entries: normalize_entries(entries),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            archive_type: ArchiveType::Unsupported,
            entries: Vec::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.archive_type != ArchiveType::Unsupported
    }

    pub fn dirs(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|e| e.is_dir)
    }

    pub fn files(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|e| !e.is_dir)
    }
}

/// Unify path separators and sort into display order.
///
/// Used for every format so the listing never depends on where the entries
/// came from.
pub fn normalize_entries(mut entries: Vec<ArchiveEntry>) -> Vec<ArchiveEntry> {
    for entry in &mut entries {
        if entry.path.contains('\\') {
            entry.path = entry.path.replace('\\', "/");
        }
    }
    entries.sort();
    entries
}
