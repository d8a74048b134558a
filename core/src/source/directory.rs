use std::ffi::OsString;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::source::SourceEntry;
use crate::types::RepackError;

/// Top-level regular files of a directory, sorted by name.
///
/// The listing is taken once at open time. Each file is read whole when its
/// entry is requested.
pub struct DirectoryEntries {
    root: PathBuf,
    names: std::vec::IntoIter<OsString>,
}

impl DirectoryEntries {
    pub fn open(path: &Path) -> Result<Self, RepackError> {
        let source_open = |source| RepackError::SourceOpen { path: path.to_path_buf(), source };

        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(source_open)? {
            let entry = entry.map_err(source_open)?;
            if entry.file_type().map_err(source_open)?.is_dir() {
                continue;
            }
            names.push(entry.file_name());
        }
        names.sort();
        debug!(path = %path.display(), files = names.len(), "listed directory");

        Ok(Self { root: path.to_path_buf(), names: names.into_iter() })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Files not yet handed out.
    pub fn remaining(&self) -> usize {
        self.names.len()
    }

    pub fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>, RepackError> {
        let Some(file_name) = self.names.next() else {
            return Ok(None);
        };

        let full = self.root.join(&file_name);
        let origin = full.display().to_string();
        let data = fs::read(&full).map_err(|source| RepackError::EntryOpen { entry: origin.clone(), source })?;

        Ok(Some(SourceEntry {
            name: file_name.to_string_lossy().into_owned(),
            origin,
            content: Box::new(Cursor::new(data)),
        }))
    }
}
