// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-evaluation chain candidates.
//!
//! Candidates are derived once per decision and live only for its span:
//! each chain element gets a position scope and its two pin-comparison
//! hashes.

use pinguard_abstractions::{CertificateScope, ChainCertificate};
use pinguard_x509::{certificate_hash, spki_hash};

/// One chain element prepared for pin comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateCandidate {
    pub scope: CertificateScope,
    /// base64 SHA-256 of the assembled SPKI; empty when the public key
    /// cannot be extracted or hashed. An empty hash can never equal a pin.
    pub spki_hash: String,
    /// base64 SHA-256 of the DER certificate.
    pub certificate_hash: String,
}

/// Derive candidates from a presented chain, leaf first.
///
/// Index 0 is the leaf, the last index is the root, and everything between
/// is an intermediate. The leaf test runs first, so a one-element chain is
/// a lone leaf and can never satisfy a root-scoped pin.
pub fn derive_candidates(chain: &[&dyn ChainCertificate]) -> Vec<CertificateCandidate> {
    let count = chain.len();
    chain
        .iter()
        .enumerate()
        .map(|(index, cert)| {
            let scope = if index == 0 {
                CertificateScope::Leaf
            } else if index == count - 1 {
                CertificateScope::Root
            } else {
                CertificateScope::Intermediate
            };

            let spki_hash = cert
                .public_key()
                .and_then(|key| spki_hash(&key).ok())
                .unwrap_or_default();

            CertificateCandidate {
                scope,
                spki_hash,
                certificate_hash: certificate_hash(cert.der()),
            }
        })
        .collect()
}
