// Container writer/reader: ordering rules, chunking, encryption, tamper and
// truncation detection.

mod common;

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use crate::common::{keypair, other_keypair};
    use repack_core::constants::MIN_CHUNK_SIZE;
    use repack_core::container::framing::{BlockHeader, BlockType};
    use repack_core::container::{ContainerError, ContainerReader, ContainerWriter, WriterOptions};
    use repack_core::crypto::TAG_LEN;
    use repack_core::headers::{CipherSuite, HeaderError, HkdfPrf};

    fn small_chunks(cipher: CipherSuite) -> WriterOptions {
        WriterOptions { cipher, hkdf_prf: HkdfPrf::Sha256, chunk_size: MIN_CHUNK_SIZE }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

    fn write_plain(streams: &[(&str, &[u8])]) -> Vec<u8> {
        let mut w = ContainerWriter::new(Vec::new()).unwrap();
        for (name, data) in streams {
            let mut s = w.open_plain_stream(name, None).unwrap();
            s.write_all(data).unwrap();
            s.close().unwrap();
        }
        w.finish().unwrap()
    }

    fn write_encrypted(options: WriterOptions, streams: &[(&str, &[u8])]) -> Vec<u8> {
        let mut w = ContainerWriter::with_options(Vec::new(), options).unwrap();
        w.register_encryption_key(&keypair().1).unwrap();
        for (name, data) in streams {
            let mut s = w.open_encrypted_stream(name, None).unwrap();
            s.write_bytes(data).unwrap();
            s.close().unwrap();
        }
        w.finish().unwrap()
    }

// ## 1. Plain streams

    #[test]
    fn plain_streams_roundtrip_in_order() {
        let bytes = write_plain(&[("a.txt", b"hello"), ("b.txt", b"world")]);
        assert_eq!(&bytes[..4], b"RPK1");

        let records = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "a.txt");
        assert_eq!(records[0].data.as_deref(), Some(&b"hello"[..]));
        assert_eq!(records[1].name, "b.txt");
        assert_eq!(records[1].data.as_deref(), Some(&b"world"[..]));
        assert!(!records[0].encrypted);
    }

    #[test]
    fn empty_container_and_empty_stream() {
        let bytes = write_plain(&[]);
        assert!(ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap().is_empty());

        let bytes = write_plain(&[("empty", b"")]);
        let records = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap();
        assert_eq!(records[0].data.as_deref(), Some(&b""[..]));
    }

    #[test]
    fn stream_extra_is_preserved() {
        let mut w = ContainerWriter::new(Vec::new()).unwrap();
        w.open_plain_stream("x", Some(&b"meta"[..])).unwrap().close().unwrap();
        let bytes = w.finish().unwrap();

        let records = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap();
        assert_eq!(records[0].extra, b"meta");
    }

    #[test]
    fn multi_chunk_stream_is_split_into_frames() {
        let data = pattern(MIN_CHUNK_SIZE * 2 + 100);
        let mut w = ContainerWriter::with_options(Vec::new(), small_chunks(CipherSuite::Aes256Gcm)).unwrap();
        let mut s = w.open_plain_stream("big.bin", None).unwrap();
        // Uneven writes must not change chunk boundaries.
        for piece in data.chunks(777) {
            s.write_all(piece).unwrap();
        }
        s.flush().unwrap();
        let stats = s.close().unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.plaintext_len, data.len() as u64);
        assert_eq!(stats.payload_len, data.len() as u64);
        let bytes = w.finish().unwrap();

        let records = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap();
        assert_eq!(records[0].data.as_ref().unwrap(), &data);
    }

// ## 2. Ordering rules

    #[test]
    fn key_registration_rules() {
        let (_, public) = keypair();

        let mut w = ContainerWriter::new(Vec::new()).unwrap();
        assert!(matches!(w.open_encrypted_stream("x", None), Err(ContainerError::MissingRecipientKey)));

        let id = w.register_encryption_key(public).unwrap();
        assert_eq!(w.recipient_key_id(), Some(id));
        assert!(matches!(w.register_encryption_key(public), Err(ContainerError::KeyAlreadyRegistered)));

        let mut w = ContainerWriter::new(Vec::new()).unwrap();
        w.open_plain_stream("first", None).unwrap().close().unwrap();
        assert!(matches!(
            w.register_encryption_key(public),
            Err(ContainerError::KeyAfterStreams { opened: 1 })
        ));
    }

    #[test]
    fn invalid_stream_names_rejected() {
        let mut w = ContainerWriter::new(Vec::new()).unwrap();
        assert!(matches!(w.open_plain_stream("", None), Err(ContainerError::InvalidStreamName(_))));
        let long = "n".repeat(u16::MAX as usize + 1);
        assert!(matches!(w.open_plain_stream(&long, None), Err(ContainerError::InvalidStreamName(_))));
    }

    #[test]
    fn invalid_chunk_size_rejected() {
        let opts = WriterOptions { chunk_size: 16, ..WriterOptions::default() };
        assert!(matches!(
            ContainerWriter::with_options(Vec::new(), opts),
            Err(ContainerError::Header(HeaderError::InvalidChunkSize { .. }))
        ));
    }

// ## 3. Encrypted streams

    #[test]
    fn encrypted_roundtrip_both_suites() {
        let data = pattern(MIN_CHUNK_SIZE * 3);
        for suite in [CipherSuite::Aes256Gcm, CipherSuite::Chacha20Poly1305] {
            let bytes = write_encrypted(small_chunks(suite), &[("readme.txt", b"secret"), ("big", data.as_slice())]);
            let reader = ContainerReader::new(Cursor::new(bytes)).unwrap();
            assert_eq!(reader.header().cipher, suite as u16);

            let records = reader.read_streams(Some(&keypair().0)).unwrap();
            assert_eq!(records[0].name, "readme.txt");
            assert!(records[0].encrypted);
            assert_eq!(records[0].data.as_deref(), Some(&b"secret"[..]));
            assert_eq!(records[1].data.as_ref().unwrap(), &data);
        }
    }

    #[test]
    fn ciphertext_does_not_contain_plaintext() {
        let bytes = write_encrypted(WriterOptions::default(), &[("s", b"very secret payload")]);
        assert!(!bytes.windows(19).any(|w| w == b"very secret payload"));
    }

    #[test]
    fn encrypted_stats_count_tags() {
        let mut w = ContainerWriter::new(Vec::new()).unwrap();
        w.register_encryption_key(&keypair().1).unwrap();
        let mut s = w.open_encrypted_stream("s", None).unwrap();
        s.write_bytes(b"hello").unwrap();
        let stats = s.close().unwrap();
        assert!(stats.encrypted);
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.plaintext_len, 5);
        assert_eq!(stats.payload_len, (5 + TAG_LEN) as u64);
    }

    #[test]
    fn names_readable_without_key() {
        let bytes = write_encrypted(WriterOptions::default(), &[("one", b"1"), ("two", b"2")]);
        let records = ContainerReader::new(Cursor::new(bytes.clone())).unwrap().read_streams(None).unwrap();
        assert!(records.iter().all(|r| r.encrypted && r.data.is_none()));

        let names = ContainerReader::new(Cursor::new(bytes)).unwrap().stream_names().unwrap();
        assert_eq!(names, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn wrong_private_key_rejected() {
        let bytes = write_encrypted(WriterOptions::default(), &[("s", b"data")]);
        let err = ContainerReader::new(Cursor::new(bytes))
            .unwrap()
            .read_streams(Some(&other_keypair().0))
            .unwrap_err();
        assert!(matches!(err, ContainerError::RecipientMismatch { .. }));
    }

// ## 4. Corruption

    /// Offset of the first body byte of the first block of `kind`.
    fn body_offset(bytes: &[u8], kind: BlockType) -> usize {
        let mut pos = 20;
        loop {
            let len = u32::from_le_bytes([bytes[pos + 1], bytes[pos + 2], bytes[pos + 3], bytes[pos + 4]]) as usize;
            if bytes[pos] == kind as u8 {
                return pos + BlockHeader::LEN;
            }
            pos += BlockHeader::LEN + len;
        }
    }

    /// Flip a body byte and patch the block CRC so only the AEAD can notice.
    fn tamper_keep_crc(bytes: &mut [u8], kind: BlockType) {
        let body = body_offset(bytes, kind);
        let head = body - BlockHeader::LEN;
        let len = u32::from_le_bytes([bytes[head + 1], bytes[head + 2], bytes[head + 3], bytes[head + 4]]) as usize;
        bytes[body] ^= 0x01;
        let crc = crc32fast::hash(&bytes[body..body + len]);
        bytes[head + 5..head + 9].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn tampered_ciphertext_detected() {
        let mut bytes = write_encrypted(WriterOptions::default(), &[("s", b"payload")]);
        tamper_keep_crc(&mut bytes, BlockType::Data);
        let err = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(Some(&keypair().0)).unwrap_err();
        assert!(matches!(err, ContainerError::Crypto(_)));
    }

    #[test]
    fn tampered_plain_data_detected_by_block_crc() {
        let mut bytes = write_plain(&[("s", b"payload")]);
        let body = body_offset(&bytes, BlockType::Data);
        bytes[body] ^= 0x01;
        let err = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap_err();
        assert!(matches!(err, ContainerError::Block(_)));
    }

    #[test]
    fn tampered_plain_data_with_fixed_crc_fails_trailer() {
        let mut bytes = write_plain(&[("s", b"payload")]);
        tamper_keep_crc(&mut bytes, BlockType::Data);
        let err = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap_err();
        assert!(matches!(err, ContainerError::TrailerMismatch(_)));
    }

    #[test]
    fn truncation_detected() {
        let bytes = write_encrypted(WriterOptions::default(), &[("s", b"payload")]);
        for cut in [bytes.len() - 1, bytes.len() - 13, 25] {
            let err = ContainerReader::new(Cursor::new(bytes[..cut].to_vec()))
                .unwrap()
                .read_streams(Some(&keypair().0))
                .unwrap_err();
            assert!(matches!(err, ContainerError::Truncated), "cut at {cut}: {err}");
        }

        let err = ContainerReader::new(Cursor::new(b"RPK1".to_vec())).err().unwrap();
        assert!(matches!(err, ContainerError::Truncated));
    }

    #[test]
    fn abandoned_stream_reads_as_truncated() {
        let mut w = ContainerWriter::new(Vec::new()).unwrap();
        let mut s = w.open_plain_stream("s", None).unwrap();
        s.write_all(b"partial").unwrap();
        drop(s);
        let bytes = w.get_ref().clone();

        let err = ContainerReader::new(Cursor::new(bytes)).unwrap().read_streams(None).unwrap_err();
        assert!(matches!(err, ContainerError::Truncated));
    }
}
