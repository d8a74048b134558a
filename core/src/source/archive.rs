use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::source::SourceEntry;
use crate::types::RepackError;
use crate::utils::base_name;

/// Members of a zip archive in stored order. Directory members are skipped.
pub struct ArchiveEntries {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
    next_index: usize,
}

impl ArchiveEntries {
    pub fn open(path: &Path) -> Result<Self, RepackError> {
        let source_open = |source: io::Error| RepackError::SourceOpen { path: path.to_path_buf(), source };

        let file = File::open(path).map_err(source_open)?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| source_open(zip_io(e)))?;
        debug!(path = %path.display(), members = archive.len(), "opened archive");

        Ok(Self { path: path.to_path_buf(), archive, next_index: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of members, directories included.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    pub fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>, RepackError> {
        while self.next_index < self.archive.len() {
            let index = self.next_index;
            self.next_index += 1;

            let (origin, is_dir) = {
                let raw = self.archive.by_index_raw(index).map_err(|e| RepackError::EntryOpen {
                    entry: format!("{}#{}", self.path.display(), index),
                    source: zip_io(e),
                })?;
                (raw.name().to_owned(), raw.is_dir())
            };

            let name = base_name(&origin).to_owned();
            if is_dir || name.is_empty() {
                warn!(member = %origin, "skipping directory member");
                continue;
            }

            let member = self.archive.by_index(index).map_err(|e| RepackError::EntryOpen {
                entry: origin.clone(),
                source: zip_io(e),
            })?;

            return Ok(Some(SourceEntry { name, origin, content: Box::new(member) }));
        }
        Ok(None)
    }
}

fn zip_io(err: ZipError) -> io::Error {
    match err {
        ZipError::Io(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}
