// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A DER-backed chain adaptor.
//!
//! Hosts on platforms with native certificate types implement
//! [`ChainCertificate`] over those types. [`DerCertificate`] is the
//! ready-made implementation for hosts (and tests) that only hold raw DER:
//! it parses once at construction and serves the extracted key material and
//! subject summary from owned fields.

use pinguard_abstractions::{
    ChainCertificate, PublicKeyAlgorithm, PublicKeyMaterial,
};
use thiserror::Error;
use x509_parser::prelude::*;

const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
const OID_CURVE_P256: &str = "1.2.840.10045.3.1.7";
const OID_CURVE_P384: &str = "1.3.132.0.34";
const OID_CURVE_P521: &str = "1.3.132.0.35";

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("certificate DER could not be parsed: {0}")]
    Parse(String),
}

/// One certificate of a chain, parsed from DER.
#[derive(Debug, Clone)]
pub struct DerCertificate {
    der: Vec<u8>,
    public_key: Option<PublicKeyMaterial>,
    subject_summary: Option<String>,
}

impl DerCertificate {
    /// Parse a DER certificate and extract the fields the engine consumes.
    ///
    /// Keys with algorithms outside the supported table are kept with
    /// `public_key = None`; such a chain element can still match
    /// certificate pins, just never SPKI pins.
    pub fn from_der(der: Vec<u8>) -> Result<Self, CertificateError> {
        let (_, cert) = X509Certificate::from_der(&der)
            .map_err(|e| CertificateError::Parse(format!("{e:?}")))?;

        let public_key = extract_public_key(&cert.tbs_certificate.subject_pki);
        let subject_summary = extract_subject_summary(&cert);

        Ok(Self {
            der,
            public_key,
            subject_summary,
        })
    }

    /// Parse every element of a chain, leaf first.
    pub fn parse_chain(chain_der: &[Vec<u8>]) -> Result<Vec<Self>, CertificateError> {
        chain_der
            .iter()
            .map(|der| Self::from_der(der.clone()))
            .collect()
    }
}

impl ChainCertificate for DerCertificate {
    fn der(&self) -> &[u8] {
        &self.der
    }

    fn public_key(&self) -> Option<PublicKeyMaterial> {
        self.public_key.clone()
    }

    fn subject_summary(&self) -> Option<String> {
        self.subject_summary.clone()
    }
}

fn extract_public_key(spki: &SubjectPublicKeyInfo<'_>) -> Option<PublicKeyMaterial> {
    let algorithm_oid = spki.algorithm.algorithm.to_id_string();
    let key_bytes = spki.subject_public_key.data.to_vec();

    match algorithm_oid.as_str() {
        OID_RSA_ENCRYPTION => Some(PublicKeyMaterial {
            algorithm: PublicKeyAlgorithm::Rsa {
                modulus_bits: rsa_modulus_bits(&key_bytes).unwrap_or(0),
            },
            // The BIT STRING payload is already the PKCS#1 encoding.
            key_bytes,
        }),
        OID_EC_PUBLIC_KEY => {
            let curve_oid = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|params| params.as_oid().ok())?
                .to_id_string();
            let field_bits = match curve_oid.as_str() {
                OID_CURVE_P256 => 256,
                OID_CURVE_P384 => 384,
                OID_CURVE_P521 => 521,
                _ => return None,
            };
            Some(PublicKeyMaterial {
                algorithm: PublicKeyAlgorithm::EllipticCurve { field_bits },
                // The BIT STRING payload is the uncompressed SEC1 point.
                key_bytes,
            })
        }
        _ => None,
    }
}

/// Modulus size of a PKCS#1 `RSAPublicKey`, ignoring the sign-padding zero.
/// Best-effort: malformed input reports 0 bits.
fn rsa_modulus_bits(pkcs1: &[u8]) -> Option<u32> {
    if pkcs1.first() != Some(&0x30) {
        return None;
    }
    let (_, content) = read_der_length(pkcs1, 1)?;
    if pkcs1.get(content) != Some(&0x02) {
        return None;
    }
    let (modulus_len, modulus_start) = read_der_length(pkcs1, content + 1)?;
    let modulus = pkcs1.get(modulus_start..modulus_start + modulus_len)?;
    let leading_zeros = modulus.iter().take_while(|b| **b == 0).count();
    Some(((modulus_len - leading_zeros) * 8) as u32)
}

fn read_der_length(data: &[u8], pos: usize) -> Option<(usize, usize)> {
    let first = *data.get(pos)?;
    if first < 0x80 {
        return Some((first as usize, pos + 1));
    }
    if first == 0x80 {
        return None;
    }
    let count = (first & 0x7f) as usize;
    if count > 4 {
        return None;
    }
    let mut len: usize = 0;
    for i in 0..count {
        len = (len << 8) | *data.get(pos + 1 + i)? as usize;
    }
    Some((len, pos + 1 + count))
}

fn extract_subject_summary(cert: &X509Certificate<'_>) -> Option<String> {
    cert.subject()
        .iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(str::to_string)
        .or_else(|| Some(cert.subject().to_string()))
}
