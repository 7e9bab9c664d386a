// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Hashing laws: fixed test vectors, output shape, and byte-level agreement
//! with real certificates.

use pinguard_abstractions::{ChainCertificate as _, PublicKeyAlgorithm, PublicKeyMaterial};
use pinguard_x509::{assemble_spki, certificate_hash, spki_hash, DerCertificate};
use sha2::Digest as _;

/// PKCS#1 `RSAPublicKey` for a synthetic RSA-2048 key: a 256-byte modulus
/// of repeated 0x01 and a 3-byte exponent of repeated 0x01. No sign
/// padding: the leading 0x01 keeps the INTEGER positive as-is.
fn synthetic_rsa_2048_pkcs1() -> Vec<u8> {
    let mut out = vec![0x30, 0x82, 0x01, 0x09];
    out.extend_from_slice(&[0x02, 0x82, 0x01, 0x00]);
    out.extend(std::iter::repeat(0x01).take(256));
    out.extend_from_slice(&[0x02, 0x03, 0x01, 0x01, 0x01]);
    out
}

#[test]
fn rsa_2048_spki_hash_matches_known_vector() {
    let key = PublicKeyMaterial {
        algorithm: PublicKeyAlgorithm::Rsa { modulus_bits: 2048 },
        key_bytes: synthetic_rsa_2048_pkcs1(),
    };

    assert_eq!(
        spki_hash(&key).unwrap(),
        "Y7EKzelfzqmyMnNRDIX8cecAf6wj1nk7nT25ws/qnVo="
    );
}

#[test]
fn spki_hash_is_44_characters_for_every_supported_algorithm() {
    let keys = [
        PublicKeyMaterial {
            algorithm: PublicKeyAlgorithm::Rsa { modulus_bits: 2048 },
            key_bytes: synthetic_rsa_2048_pkcs1(),
        },
        PublicKeyMaterial {
            algorithm: PublicKeyAlgorithm::EllipticCurve { field_bits: 256 },
            key_bytes: vec![0x04; 65],
        },
        PublicKeyMaterial {
            algorithm: PublicKeyAlgorithm::EllipticCurve { field_bits: 384 },
            key_bytes: vec![0x04; 97],
        },
        PublicKeyMaterial {
            algorithm: PublicKeyAlgorithm::EllipticCurve { field_bits: 521 },
            key_bytes: vec![0x04; 133],
        },
    ];

    for key in keys {
        assert_eq!(spki_hash(&key).unwrap().len(), 44);
    }
}

#[test]
fn certificate_hash_is_deterministic_and_input_sensitive() {
    let a = certificate_hash(b"certificate one");
    assert_eq!(a, certificate_hash(b"certificate one"));
    assert_ne!(a, certificate_hash(b"certificate two"));
    assert_eq!(a.len(), 44);
}

#[test]
fn assembled_spki_matches_a_real_p256_certificate() {
    // The SPKI rebuilt from the extracted key must be byte-identical to the
    // SubjectPublicKeyInfo embedded in the certificate itself.
    let certified = rcgen::generate_simple_self_signed(["example.test".to_string()]).unwrap();
    let der = certified.cert.der().to_vec();

    let parsed = DerCertificate::from_der(der.clone()).unwrap();
    let key = parsed.public_key().expect("P-256 key should be extracted");
    assert_eq!(
        key.algorithm,
        PublicKeyAlgorithm::EllipticCurve { field_bits: 256 }
    );

    let (_, cert) = x509_parser::parse_x509_certificate(&der).unwrap();
    let embedded_spki = cert.tbs_certificate.subject_pki.raw;
    assert_eq!(assemble_spki(&key).unwrap(), embedded_spki);

    // And the pin hash therefore equals the digest of the embedded bytes.
    use base64::Engine as _;
    let expected =
        base64::engine::general_purpose::STANDARD.encode(sha2::Sha256::digest(embedded_spki));
    assert_eq!(spki_hash(&key).unwrap(), expected);
}

#[test]
fn bit_string_length_crosses_the_long_form_boundary() {
    // 126 key bytes + the unused-bits octet = 127: still short form.
    // 127 key bytes + the unused-bits octet = 128: first long-form length.
    let short = PublicKeyMaterial {
        algorithm: PublicKeyAlgorithm::Rsa { modulus_bits: 1024 },
        key_bytes: vec![0xab; 126],
    };
    let long = PublicKeyMaterial {
        algorithm: PublicKeyAlgorithm::Rsa { modulus_bits: 1024 },
        key_bytes: vec![0xab; 127],
    };

    let short_spki = assemble_spki(&short).unwrap();
    let long_spki = assemble_spki(&long).unwrap();

    let bit_string_at = |spki: &[u8]| {
        // Skip SEQUENCE header + the 15-byte RSA AlgorithmIdentifier.
        let header = if spki[1] < 0x80 { 2 } else { 2 + (spki[1] & 0x7f) as usize };
        header + 15
    };

    let s = bit_string_at(&short_spki);
    assert_eq!(&short_spki[s..s + 2], &[0x03, 0x7f]);

    let l = bit_string_at(&long_spki);
    assert_eq!(&long_spki[l..l + 3], &[0x03, 0x81, 0x80]);
}
