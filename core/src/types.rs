use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::container::ContainerError;
use crate::keys::KeyError;

/// Coarse failure classes reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    SourceOpen,
    EntryOpen,
    KeyLoad,
    DestinationCreate,
    StreamWrite,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Usage => "UsageError",
            ErrorKind::SourceOpen => "SourceOpenError",
            ErrorKind::EntryOpen => "EntryOpenError",
            ErrorKind::KeyLoad => "KeyLoadError",
            ErrorKind::DestinationCreate => "DestinationCreateError",
            ErrorKind::StreamWrite => "StreamWriteError",
        }
    }
}

/// Run-terminating failure. Every variant names the path, entry or stream
/// involved so the rendered message stands alone as a diagnostic line.
#[derive(Debug, Error)]
pub enum RepackError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot open source {}: {source}", path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read entry {entry}: {source}")]
    EntryOpen {
        entry: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot load public key {}: {source}", path.display())]
    KeyLoad {
        path: PathBuf,
        #[source]
        source: KeyError,
    },

    #[error("cannot create destination {}: {source}", path.display())]
    DestinationCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write stream {stream}: {source}")]
    StreamWrite {
        stream: String,
        #[source]
        source: ContainerError,
    },

    /// Container-level failure outside any single stream (header, recipient
    /// block, end-of-container).
    #[error("cannot write container {}: {source}", path.display())]
    Container {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },
}

impl RepackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepackError::Usage(_) => ErrorKind::Usage,
            RepackError::SourceOpen { .. } => ErrorKind::SourceOpen,
            RepackError::EntryOpen { .. } => ErrorKind::EntryOpen,
            RepackError::KeyLoad { .. } => ErrorKind::KeyLoad,
            RepackError::DestinationCreate { .. } => ErrorKind::DestinationCreate,
            RepackError::StreamWrite { .. } | RepackError::Container { .. } => ErrorKind::StreamWrite,
        }
    }

    /// Process exit status: 2 for usage errors, 1 for every other failure.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Usage => 2,
            _ => 1,
        }
    }
}
