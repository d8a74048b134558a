mod common;

#[cfg(test)]
mod tests {
    use crate::common::{keypair, other_keypair};
    use repack_core::crypto::{
        build_frame_aad, build_stream_aad_prefix, derive_nonce_12_tls_style, recipient_key_id, unwrap_master_key,
        wrap_master_key, AadError, AeadImpl, CryptoError, FrameAad, NonceError, TAG_LEN,
    };
    use repack_core::headers::{CipherSuite, ContainerHeader, HkdfPrf};

    fn aead(suite: CipherSuite) -> AeadImpl {
        AeadImpl::from_suite_and_key(suite, &[0x11; 32]).unwrap()
    }

    #[test]
    fn seal_open_roundtrip_both_suites() {
        for suite in [CipherSuite::Aes256Gcm, CipherSuite::Chacha20Poly1305] {
            let a = aead(suite);
            let nonce = [7u8; 12];
            let ct = a.seal(&nonce, b"aad", b"hello").unwrap();
            assert_eq!(ct.len(), 5 + TAG_LEN);
            assert_eq!(a.open(&nonce, b"aad", &ct).unwrap(), b"hello");
        }
    }

    #[test]
    fn open_fails_on_wrong_aad_or_tamper() {
        let a = aead(CipherSuite::Chacha20Poly1305);
        let nonce = [7u8; 12];
        let mut ct = a.seal(&nonce, b"aad", b"hello").unwrap();

        assert!(matches!(a.open(&nonce, b"other", &ct), Err(CryptoError::TagMismatch)));
        ct[0] ^= 1;
        assert!(matches!(a.open(&nonce, b"aad", &ct), Err(CryptoError::TagMismatch)));
    }

    #[test]
    fn rejects_bad_key_and_nonce_lengths() {
        assert!(matches!(
            AeadImpl::from_suite_and_key(CipherSuite::Aes256Gcm, &[0u8; 16]),
            Err(CryptoError::InvalidKeyLen { expected: 32, actual: 16 })
        ));
        let a = aead(CipherSuite::Aes256Gcm);
        assert!(matches!(a.seal(&[0u8; 8], b"", b"x"), Err(CryptoError::InvalidNonceLen { .. })));
        assert!(a.seal(&[1u8; 12], b"", b"").is_err());
    }

    #[test]
    fn header_selects_cipher() {
        let mut h = ContainerHeader::new(CipherSuite::Aes256Gcm, HkdfPrf::Sha256, 64 * 1024);
        assert!(matches!(AeadImpl::from_header_and_key(&h, &[0u8; 32]).unwrap(), AeadImpl::AesGcm(_)));
        h.cipher = 0x00EE;
        assert!(matches!(
            AeadImpl::from_header_and_key(&h, &[0u8; 32]),
            Err(CryptoError::UnsupportedCipher { cipher_id: 0x00EE })
        ));
    }

    #[test]
    fn nonce_xors_frame_index_into_low_bytes() {
        let salt = [0xAAu8; 16];
        let n0 = derive_nonce_12_tls_style(&salt, 0).unwrap();
        let n1 = derive_nonce_12_tls_style(&salt, 1).unwrap();
        assert_eq!(n0, [0xAA; 12]);
        assert_eq!(&n1[..4], &[0xAA; 4]);
        assert_eq!(n1[4], 0xAA ^ 0x01);
        assert_eq!(&n1[5..], &n0[5..]);

        assert!(matches!(derive_nonce_12_tls_style(&[0u8; 16], 0), Err(NonceError::InvalidSalt)));
    }

    #[test]
    fn frame_aad_appends_fields_to_prefix() {
        let header = ContainerHeader::default();
        let prefix = build_stream_aad_prefix(&header, b"open-body").unwrap();
        assert_eq!(prefix.len(), ContainerHeader::LEN + 9);

        let frame = FrameAad { block_type: 0x04, frame_index: 2, plaintext_len: 5 };
        let aad = build_frame_aad(&prefix, &frame).unwrap();
        assert_eq!(aad.len(), prefix.len() + FrameAad::LEN);
        assert_eq!(&aad[prefix.len()..], &[0x04, 2, 0, 0, 0, 5, 0, 0, 0]);

        assert!(matches!(build_frame_aad(&[], &frame), Err(AadError::MissingPrefix)));
    }

    #[test]
    fn master_key_wraps_for_recipient_only() {
        let (private, public) = keypair();
        let master = [0x5Au8; 32];

        let wrapped = wrap_master_key(public, &master).unwrap();
        assert_eq!(unwrap_master_key(private, &wrapped).unwrap(), master);

        let (other_private, _) = other_keypair();
        assert!(matches!(unwrap_master_key(other_private, &wrapped), Err(CryptoError::KeyWrap(_))));
    }

    #[test]
    fn recipient_key_id_is_stable_and_distinct() {
        let (_, public) = keypair();
        let (_, other) = other_keypair();
        assert_eq!(recipient_key_id(public).unwrap(), recipient_key_id(public).unwrap());
        assert_ne!(recipient_key_id(public).unwrap(), recipient_key_id(other).unwrap());
    }
}
