use crate::entry::ArchiveType;

/// Archive formats the previewer knows how to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Detect archive format from the file name extension.
    ///
    /// Matching is case-insensitive and looks at the name only; the content
    /// is never sniffed. A bare `.gz` is assumed to wrap a tar stream.
    pub fn from_name(name: &str) -> Option<Self> {
        let name_lower = name.to_lowercase();
        if name_lower.ends_with(".zip") {
            return Some(ArchiveFormat::Zip);
        }
        if name_lower.ends_with(".tar") {
            return Some(ArchiveFormat::Tar);
        }
        if name_lower.ends_with(".tgz") || name_lower.ends_with(".gz") {
            return Some(ArchiveFormat::TarGz);
        }
        None
    }

    /// The type reported in preview results
    pub fn archive_type(self) -> ArchiveType {
        match self {
            ArchiveFormat::Zip => ArchiveType::Zip,
            ArchiveFormat::Tar | ArchiveFormat::TarGz => ArchiveType::Tar,
        }
    }
}

/// Whether `name` carries an extension the previewer can list
pub fn is_supported_archive(name: &str) -> bool {
    ArchiveFormat::from_name(name).is_some()
}
