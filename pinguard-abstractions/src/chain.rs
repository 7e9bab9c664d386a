// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Chain adaptor interfaces.
//!
//! The engine does not talk to a TLS stack directly. The host supplies the
//! presented chain through [`ChainCertificate`], exposing for each element:
//! the DER bytes, the public key algorithm plus its external representation,
//! and an optional subject summary string. The host's native trust store
//! verdict enters through [`SystemTrustOutcome`].

use crate::pin::PinScope;

/// Position of a certificate within a presented chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CertificateScope {
    Leaf,
    Intermediate,
    Root,
}

impl CertificateScope {
    /// Whether a pin with the given scope may match a candidate at this
    /// position. `Any` matches every position; otherwise positions must be
    /// equal.
    pub fn contains(self, pin_scope: PinScope) -> bool {
        match pin_scope {
            PinScope::Any => true,
            PinScope::Leaf => self == CertificateScope::Leaf,
            PinScope::Intermediate => self == CertificateScope::Intermediate,
            PinScope::Root => self == CertificateScope::Root,
        }
    }

    /// Intermediate and root positions are CA positions.
    pub fn is_ca(self) -> bool {
        matches!(self, CertificateScope::Intermediate | CertificateScope::Root)
    }
}

/// Public key algorithm tag plus size, as reported by the host platform.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PublicKeyAlgorithm {
    Rsa { modulus_bits: u32 },
    EllipticCurve { field_bits: u32 },
}

/// A public key in its platform external representation.
///
/// RSA keys use the PKCS#1 `SEQUENCE { modulus, exponent }` encoding; EC keys
/// use the uncompressed SEC1 point `04 || X || Y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    pub algorithm: PublicKeyAlgorithm,
    pub key_bytes: Vec<u8>,
}

/// One certificate of a presented chain, as exposed by the host.
pub trait ChainCertificate {
    /// The DER encoding of the certificate.
    fn der(&self) -> &[u8];

    /// The certificate's public key, if the host can extract it.
    ///
    /// Returning `None` is not an error: the corresponding chain candidate
    /// records an empty SPKI hash, which cannot match any pin.
    fn public_key(&self) -> Option<PublicKeyMaterial>;

    /// An optional human-readable subject summary (typically the CN).
    fn subject_summary(&self) -> Option<String> {
        None
    }
}

/// Outcome of the host platform's native chain verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTrustOutcome {
    pub is_trusted: bool,
    pub error_text: Option<String>,
}

impl SystemTrustOutcome {
    pub fn trusted() -> Self {
        Self {
            is_trusted: true,
            error_text: None,
        }
    }

    pub fn untrusted(error_text: impl Into<Option<String>>) -> Self {
        Self {
            is_trusted: false,
            error_text: error_text.into(),
        }
    }
}

impl From<bool> for SystemTrustOutcome {
    fn from(is_trusted: bool) -> Self {
        Self {
            is_trusted,
            error_text: None,
        }
    }
}

/// Host-provided native trust evaluation over a presented chain.
pub trait SystemTrustEvaluator {
    fn evaluate(&self, chain: &[&dyn ChainCertificate], host: &str) -> SystemTrustOutcome;
}
