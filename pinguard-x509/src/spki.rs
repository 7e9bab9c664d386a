// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Pin hashing and SubjectPublicKeyInfo assembly.
//!
//! The SPKI is built as `SEQUENCE { AlgorithmIdentifier, BIT STRING(key) }`
//! from a table of fixed AlgorithmIdentifier DER fragments. The on-wire
//! bytes are fixed exactly so hashes match those produced by any other
//! implementation of the same scheme, byte for byte.

use base64::Engine as _;
use pinguard_abstractions::{PublicKeyAlgorithm, PublicKeyMaterial};
use sha2::{Digest as _, Sha256};
use thiserror::Error;

/// AlgorithmIdentifier for rsaEncryption (1.2.840.113549.1.1.1) with NULL
/// parameters. RSA keys of any size share this fragment.
const ALGORITHM_ID_RSA: [u8; 15] = [
    0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05, 0x00,
];

/// AlgorithmIdentifier for ecPublicKey (1.2.840.10045.2.1) with the P-256
/// curve parameter (1.2.840.10045.3.1.7).
const ALGORITHM_ID_EC_P256: [u8; 21] = [
    0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08, 0x2a, 0x86,
    0x48, 0xce, 0x3d, 0x03, 0x01, 0x07,
];

/// AlgorithmIdentifier for ecPublicKey with the P-384 curve parameter
/// (1.3.132.0.34).
const ALGORITHM_ID_EC_P384: [u8; 18] = [
    0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05, 0x2b, 0x81,
    0x04, 0x00, 0x22,
];

/// AlgorithmIdentifier for ecPublicKey with the P-521 curve parameter
/// (1.3.132.0.35).
const ALGORITHM_ID_EC_P521: [u8; 18] = [
    0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05, 0x2b, 0x81,
    0x04, 0x00, 0x23,
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpkiError {
    #[error("unsupported key type: {algorithm:?}")]
    UnsupportedKeyType { algorithm: PublicKeyAlgorithm },
}

fn algorithm_identifier(algorithm: PublicKeyAlgorithm) -> Result<&'static [u8], SpkiError> {
    match algorithm {
        PublicKeyAlgorithm::Rsa { .. } => Ok(&ALGORITHM_ID_RSA),
        PublicKeyAlgorithm::EllipticCurve { field_bits: 256 } => Ok(&ALGORITHM_ID_EC_P256),
        PublicKeyAlgorithm::EllipticCurve { field_bits: 384 } => Ok(&ALGORITHM_ID_EC_P384),
        PublicKeyAlgorithm::EllipticCurve { field_bits: 521 } => Ok(&ALGORITHM_ID_EC_P521),
        other => Err(SpkiError::UnsupportedKeyType { algorithm: other }),
    }
}

/// DER length octets: short form below 128, otherwise `0x80 | n` followed
/// by the minimal big-endian length bytes.
fn push_der_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }

    let be = len.to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();
    let significant = &be[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

/// Assemble the DER SubjectPublicKeyInfo for a key's external
/// representation.
///
/// The BIT STRING carries a leading zero "unused bits" octet before the key
/// bytes. Fails with [`SpkiError::UnsupportedKeyType`] when the algorithm
/// and size are not in the identifier table.
pub fn assemble_spki(key: &PublicKeyMaterial) -> Result<Vec<u8>, SpkiError> {
    let algorithm_id = algorithm_identifier(key.algorithm)?;

    let mut bit_string = Vec::with_capacity(key.key_bytes.len() + 8);
    bit_string.push(0x03);
    push_der_length(&mut bit_string, key.key_bytes.len() + 1);
    bit_string.push(0x00);
    bit_string.extend_from_slice(&key.key_bytes);

    let content_len = algorithm_id.len() + bit_string.len();
    let mut spki = Vec::with_capacity(content_len + 8);
    spki.push(0x30);
    push_der_length(&mut spki, content_len);
    spki.extend_from_slice(algorithm_id);
    spki.extend_from_slice(&bit_string);
    Ok(spki)
}

fn base64_sha256(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(Sha256::digest(data))
}

/// base64( SHA-256( assembled SPKI ) ) for a public key.
pub fn spki_hash(key: &PublicKeyMaterial) -> Result<String, SpkiError> {
    Ok(base64_sha256(&assemble_spki(key)?))
}

/// base64( SHA-256( DER certificate ) ).
pub fn certificate_hash(der: &[u8]) -> String {
    base64_sha256(der)
}
