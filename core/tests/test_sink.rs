mod common;

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use crate::common::keypair;
    use repack_core::container::{ContainerReader, ContainerWriter};
    use repack_core::keys::PublicKey;
    use repack_core::sink::{StreamMode, StreamSink};
    use repack_core::source::SourceEntry;
    use repack_core::types::ErrorKind;

    fn entry(name: &str, data: &'static [u8]) -> SourceEntry<'static> {
        SourceEntry { name: name.into(), origin: format!("src/{name}"), content: Box::new(Cursor::new(data)) }
    }

    /// Reader that yields some bytes then fails.
    struct Flaky(usize);

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0 == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            self.0 -= 1;
            buf[0] = b'x';
            Ok(1)
        }
    }

    #[test]
    fn plain_sink_writes_streams_in_order() {
        let mut sink = StreamSink::plain(ContainerWriter::new(Vec::new()).unwrap());
        assert_eq!(sink.mode(), StreamMode::Plain);

        sink.transfer(entry("a.txt", b"hello")).unwrap();
        sink.transfer(entry("b.txt", b"world")).unwrap();
        assert_eq!(sink.counters().streams_plain, 2);

        let (bytes, counters) = sink.finish().unwrap();
        assert_eq!(counters.bytes_written(), bytes.len() as u64);

        let names = ContainerReader::new(Cursor::new(bytes)).unwrap().stream_names().unwrap();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[test]
    fn encrypted_sink_registers_key_once() {
        let key = PublicKey::from_rsa(keypair().1.clone(), "mem").unwrap();
        let mut sink = StreamSink::encrypted(ContainerWriter::new(Vec::new()).unwrap(), &key).unwrap();
        assert_eq!(sink.mode(), StreamMode::Encrypted);

        let stats = sink.transfer(entry("s", b"secret")).unwrap();
        assert!(stats.encrypted);

        let (bytes, _) = sink.finish().unwrap();
        let records = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(Some(&keypair().0)).unwrap();
        assert_eq!(records[0].data.as_deref(), Some(&b"secret"[..]));
    }

    #[test]
    fn encrypted_sink_refuses_container_with_key() {
        let key = PublicKey::from_rsa(keypair().1.clone(), "mem").unwrap();
        let mut container = ContainerWriter::new(Vec::new()).unwrap();
        container.register_encryption_key(key.rsa()).unwrap();
        assert!(StreamSink::encrypted(container, &key).is_err());
    }

    #[test]
    fn read_failure_is_entry_error() {
        let mut sink = StreamSink::plain(ContainerWriter::new(Vec::new()).unwrap());
        let bad = SourceEntry { name: "bad".into(), origin: "src/bad".into(), content: Box::new(Flaky(3)) };
        let err = sink.transfer(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntryOpen);
        assert!(err.to_string().contains("src/bad"));
    }

    #[test]
    fn bad_stream_name_is_stream_write_error() {
        let mut sink = StreamSink::plain(ContainerWriter::new(Vec::new()).unwrap());
        let err = sink.transfer(entry("", b"x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StreamWrite);
    }
}
