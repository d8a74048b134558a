#[cfg(test)]
mod tests {
    use repack_core::container::StreamStats;
    use repack_core::telemetry::PackCounters;

    fn stats(encrypted: bool, plaintext_len: u64, frames: u32, payload_len: u64, overhead_len: u64) -> StreamStats {
        StreamStats { encrypted, frames, plaintext_len, payload_len, overhead_len }
    }

    #[test]
    fn add_stream_splits_by_mode() {
        let mut c = PackCounters::default();
        c.add_stream(&stats(false, 5, 1, 5, 30));
        c.add_stream(&stats(true, 10, 1, 26, 60));

        assert_eq!(c.streams_plain, 1);
        assert_eq!(c.streams_encrypted, 1);
        assert_eq!(c.streams(), 2);
        assert_eq!(c.frames_data, 2);
        assert_eq!(c.bytes_plaintext, 15);
        assert_eq!(c.bytes_payload, 31);
        assert_eq!(c.bytes_overhead, 90);
        assert_eq!(c.bytes_written(), 121);
    }

    #[test]
    fn merge_and_add_assign_agree() {
        let mut a = PackCounters::default();
        a.add_stream(&stats(false, 100, 2, 100, 40));
        let mut b = PackCounters::default();
        b.add_stream(&stats(true, 7, 1, 23, 50));
        b.add_overhead(33);

        let mut merged = a;
        merged.merge(&b);
        let mut summed = a;
        summed += b;

        assert_eq!(merged, summed);
        assert_eq!(merged.bytes_overhead, 40 + 50 + 33);
    }

    #[test]
    fn empty_stream_counts_no_frames() {
        let mut c = PackCounters::default();
        c.add_stream(&stats(false, 0, 0, 0, 25));
        assert_eq!(c.streams(), 1);
        assert_eq!(c.frames_data, 0);
        assert_eq!(c.bytes_plaintext, 0);
    }

    #[test]
    fn display_summarises_counts() {
        let mut c = PackCounters::default();
        c.add_stream(&stats(false, 5, 1, 5, 30));
        let text = c.to_string();
        assert!(text.starts_with("1 streams (1 plain, 0 encrypted)"), "{text}");
        assert!(text.contains("5 plaintext bytes"));
    }
}
