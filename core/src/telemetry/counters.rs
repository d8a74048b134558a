//! telemetry/counters.rs
//! Mutable counters used while packing.
//!
//! Summary: stream, frame and byte counts accumulated by the sink, returned to
//! the caller inside the run summary.
use std::fmt;
use std::ops::AddAssign;

use crate::container::StreamStats;

/// Deterministic counters collected during one run.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackCounters {
    pub streams_plain: u64,
    pub streams_encrypted: u64,
    pub frames_data: u64,
    pub bytes_plaintext: u64,
    /// Data block bodies as written (ciphertext and tags for encrypted streams).
    pub bytes_payload: u64,
    pub bytes_overhead: u64,
}

impl PackCounters {
    /// Record one closed stream.
    pub fn add_stream(&mut self, stats: &StreamStats) {
        if stats.encrypted {
            self.streams_encrypted += 1;
        } else {
            self.streams_plain += 1;
        }
        self.frames_data += stats.frames as u64;
        self.bytes_plaintext += stats.plaintext_len;
        self.bytes_payload += stats.payload_len;
        self.bytes_overhead += stats.overhead_len;
    }

    /// Record container-level blocks (header, recipient key, trailer).
    pub fn add_overhead(&mut self, len: u64) {
        self.bytes_overhead += len;
    }

    pub fn streams(&self) -> u64 {
        self.streams_plain + self.streams_encrypted
    }

    /// Bytes that ended up in the container.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_payload + self.bytes_overhead
    }

    pub fn merge(&mut self, other: &PackCounters) {
        self.streams_plain += other.streams_plain;
        self.streams_encrypted += other.streams_encrypted;
        self.frames_data += other.frames_data;

        self.bytes_plaintext += other.bytes_plaintext;
        self.bytes_payload += other.bytes_payload;
        self.bytes_overhead += other.bytes_overhead;
    }
}

impl AddAssign for PackCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

impl fmt::Display for PackCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} streams ({} plain, {} encrypted), {} frames, {} plaintext bytes, {} bytes written",
            self.streams(),
            self.streams_plain,
            self.streams_encrypted,
            self.frames_data,
            self.bytes_plaintext,
            self.bytes_written(),
        )
    }
}
