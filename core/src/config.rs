//! config.rs
//! Run configuration, computed once from the invocation and then read-only.

use std::path::{Component, Path, PathBuf};

use crate::constants::{suffixes, ARCHIVE_SUFFIX, DEFAULT_CHUNK_SIZE, DEFAULT_PUBLIC_KEY_PATH};
use crate::container::WriterOptions;
use crate::headers::{CipherSuite, HkdfPrf};
use crate::source::{source_kind, SourceKind};
use crate::types::RepackError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encryption {
    Disabled,
    Enabled { public_key: PathBuf },
}

/// Output naming and mode family.
///
/// `Alt` always encrypts and names its output `<base>_alt.enc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    General,
    Alt,
}

/// Caller-facing knobs, before the source path is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub encrypt: bool,
    pub variant: Variant,
    pub public_key: PathBuf,
    pub out_dir: PathBuf,
    pub cipher: CipherSuite,
    pub chunk_size: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            encrypt: false,
            variant: Variant::General,
            public_key: PathBuf::from(DEFAULT_PUBLIC_KEY_PATH),
            out_dir: PathBuf::from("."),
            cipher: CipherSuite::Chacha20Poly1305,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl RunOptions {
    pub fn encrypt(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn public_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_key = path.into();
        self
    }

    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = path.into();
        self
    }

    pub fn cipher(mut self, cipher: CipherSuite) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    source: PathBuf,
    source_kind: SourceKind,
    encryption: Encryption,
    variant: Variant,
    cipher: CipherSuite,
    chunk_size: usize,
    destination: PathBuf,
}

impl RunConfig {
    /// Build the run configuration from the positional sources and options.
    ///
    /// Exactly one source is accepted; zero or several is a usage error.
    pub fn from_invocation(sources: &[PathBuf], opts: &RunOptions) -> Result<Self, RepackError> {
        let source = match sources {
            [] => return Err(RepackError::Usage("missing source zip file or directory".into())),
            [one] => clean_path(one),
            _ => return Err(RepackError::Usage("only 1 zip file or directory can be repacked".into())),
        };

        let encrypted = opts.encrypt || opts.variant == Variant::Alt;
        let encryption = if encrypted {
            Encryption::Enabled { public_key: clean_path(&opts.public_key) }
        } else {
            Encryption::Disabled
        };

        let suffix = match (opts.variant, encrypted) {
            (Variant::Alt, _) => suffixes::ALT_ENCRYPTED,
            (Variant::General, true) => suffixes::REPACKED_ENCRYPTED,
            (Variant::General, false) => suffixes::REPACKED_PLAIN,
        };

        let base = source_base_name(&source)?;
        let stem = base.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(&base);
        let destination = opts.out_dir.join(format!("{stem}{suffix}"));

        Ok(Self {
            source_kind: source_kind(&source),
            source,
            encryption,
            variant: opts.variant,
            cipher: opts.cipher,
            chunk_size: opts.chunk_size,
            destination,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn encryption(&self) -> &Encryption {
        &self.encryption
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self.encryption, Encryption::Enabled { .. })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            cipher: self.cipher,
            hkdf_prf: HkdfPrf::Sha256,
            chunk_size: self.chunk_size,
        }
    }
}

/// Lexically clean a path: drop `.` components and trailing separators,
/// fold `name/..` pairs. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

/// Final name component of an already cleaned source path. Paths without one
/// (`.`, `..`, `/`) are resolved against the filesystem first.
fn source_base_name(cleaned: &Path) -> Result<String, RepackError> {
    if let Some(name) = cleaned.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    let resolved = cleaned
        .canonicalize()
        .map_err(|source| RepackError::SourceOpen { path: cleaned.to_path_buf(), source })?;

    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| RepackError::Usage(format!("cannot derive an output name from {}", cleaned.display())))
}
