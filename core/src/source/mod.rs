//! source/mod.rs
//! Entry sources: the files to be packed, one at a time, in a stable order.
//!
//! A source path ending in `.zip` is read as an archive; anything else is read
//! as a directory. Each entry borrows its source, so the next entry can only be
//! requested once the current one has been dropped.

pub mod archive;
pub mod directory;

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::constants::ARCHIVE_SUFFIX;
use crate::types::RepackError;

pub use archive::ArchiveEntries;
pub use directory::DirectoryEntries;

/// One file to pack.
pub struct SourceEntry<'a> {
    /// Base name, used as the stream name.
    pub name: String,
    /// Full member name or file path, used in diagnostics.
    pub origin: String,
    pub content: Box<dyn Read + 'a>,
}

impl fmt::Debug for SourceEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceEntry")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Archive,
    Directory,
}

pub enum EntrySource {
    Archive(ArchiveEntries),
    Directory(DirectoryEntries),
}

impl EntrySource {
    pub fn open(path: &Path) -> Result<Self, RepackError> {
        match source_kind(path) {
            SourceKind::Archive => Ok(EntrySource::Archive(ArchiveEntries::open(path)?)),
            SourceKind::Directory => Ok(EntrySource::Directory(DirectoryEntries::open(path)?)),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            EntrySource::Archive(_) => SourceKind::Archive,
            EntrySource::Directory(_) => SourceKind::Directory,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            EntrySource::Archive(a) => a.path(),
            EntrySource::Directory(d) => d.path(),
        }
    }

    /// Next entry, or `None` when the source is exhausted.
    pub fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>, RepackError> {
        match self {
            EntrySource::Archive(a) => a.next_entry(),
            EntrySource::Directory(d) => d.next_entry(),
        }
    }
}

/// Archive or directory, decided by the path text alone.
pub fn source_kind(path: &Path) -> SourceKind {
    if path.to_string_lossy().ends_with(ARCHIVE_SUFFIX) {
        SourceKind::Archive
    } else {
        SourceKind::Directory
    }
}
