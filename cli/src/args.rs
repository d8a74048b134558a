use std::path::PathBuf;

use clap::Parser;
use repack_core::config::{RunOptions, Variant};
use repack_core::constants::DEFAULT_PUBLIC_KEY_PATH;
use repack_core::headers::CipherSuite;

#[derive(Parser, Debug)]
#[command(
    name = "repack",
    about = "Repack a zip archive or a directory into a multi-stream container",
    disable_version_flag = true
)]
pub struct Cli {
    /// Print tool version
    #[arg(long)]
    pub version: bool,

    /// Encrypt every stream for the recipient public key
    #[arg(long)]
    pub encrypt: bool,

    /// Encrypt-only output, named <base>_alt.enc
    #[arg(long)]
    pub alt: bool,

    /// Recipient public key (PEM or DER)
    #[arg(long, default_value = DEFAULT_PUBLIC_KEY_PATH, env = "REPACK_PUBLIC_KEY")]
    pub public_key: PathBuf,

    /// Directory the container is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Stream cipher for encrypted containers
    #[arg(long, value_enum, default_value_t)]
    pub cipher: CipherArg,

    /// More log output on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Zip file or directory to repack
    pub sources: Vec<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum CipherArg {
    #[value(name = "aes256-gcm")]
    Aes256Gcm,
    #[default]
    #[value(name = "chacha20-poly1305")]
    Chacha20Poly1305,
}

impl From<CipherArg> for CipherSuite {
    fn from(c: CipherArg) -> Self {
        match c {
            CipherArg::Aes256Gcm => CipherSuite::Aes256Gcm,
            CipherArg::Chacha20Poly1305 => CipherSuite::Chacha20Poly1305,
        }
    }
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        let variant = if self.alt { Variant::Alt } else { Variant::General };
        RunOptions::default()
            .encrypt(self.encrypt)
            .variant(variant)
            .public_key(&self.public_key)
            .out_dir(&self.out_dir)
            .cipher(self.cipher.into())
    }
}
