//! pipeline.rs
//! Run orchestration: key, source, destination, container, transfer loop.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{Encryption, RunConfig};
use crate::container::{ContainerError, ContainerWriter};
use crate::keys::load_public_key;
use crate::sink::StreamSink;
use crate::source::EntrySource;
use crate::telemetry::PackCounters;
use crate::types::RepackError;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub destination: PathBuf,
    pub counters: PackCounters,
    pub elapsed: Duration,
}

/// Pack the configured source into the configured destination.
///
/// Order matters for what is left behind on failure: the key and the source
/// are opened before the destination file is created, so neither failure
/// creates it. Failures after that leave a partial destination in place.
pub fn run(config: &RunConfig) -> Result<RunSummary, RepackError> {
    let started = Instant::now();

    let key = match config.encryption() {
        Encryption::Enabled { public_key } => Some(
            load_public_key(public_key)
                .map_err(|source| RepackError::KeyLoad { path: public_key.clone(), source })?,
        ),
        Encryption::Disabled => None,
    };

    let mut source = EntrySource::open(config.source())?;
    debug!(source = %config.source().display(), kind = ?source.kind(), "opened source");

    let destination = config.destination().to_path_buf();
    let container_err = |source: ContainerError| RepackError::Container { path: destination.clone(), source };

    let file = File::create(&destination)
        .map_err(|source| RepackError::DestinationCreate { path: destination.clone(), source })?;
    let container = ContainerWriter::with_options(BufWriter::new(file), config.writer_options())
        .map_err(container_err)?;

    let mut sink = match &key {
        Some(key) => {
            debug!(fingerprint = %key.fingerprint(), "encrypting for recipient");
            StreamSink::encrypted(container, key).map_err(container_err)?
        }
        None => StreamSink::plain(container),
    };

    while let Some(entry) = source.next_entry()? {
        sink.transfer(entry)?;
    }

    let (writer, counters) = sink.finish().map_err(container_err)?;
    writer
        .into_inner()
        .map_err(|e| container_err(ContainerError::Io(e.into_error())))?;

    let summary = RunSummary { destination, counters, elapsed: started.elapsed() };
    info!(
        destination = %summary.destination.display(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "{}",
        summary.counters
    );
    Ok(summary)
}
