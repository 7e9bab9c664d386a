// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! HMAC and public-key blob verifiers.
//!
//! Both verifiers are total functions to `bool`: a missing secret or key,
//! a signature-type mismatch, or any cryptographic failure all report
//! `false`, indistinguishably.

use hmac::{Hmac, Mac as _};
use p256::pkcs8::DecodePublicKey as _;
use sha2::{Digest as _, Sha256};
use signature::hazmat::PrehashVerifier as _;
use subtle::ConstantTimeEq as _;

use pinguard_policy::{PolicyError, PolicySet};

use crate::blob::{RemoteConfigBlob, SignatureType};

type HmacSha256 = Hmac<Sha256>;

/// Resolves HMAC secrets by identifier. `None` means rejection.
pub trait SecretResolver {
    fn secret(&self, secret_id: &str) -> Option<Vec<u8>>;
}

/// Resolves ECDSA verifying keys by identifier. `None` means rejection.
pub trait VerifyingKeyResolver {
    fn key(&self, key_id: &str) -> Option<EcdsaVerifyingKey>;
}

/// An ECDSA-over-SHA-256 verifying key on one of the supported curves.
#[derive(Debug, Clone)]
pub enum EcdsaVerifyingKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

impl EcdsaVerifyingKey {
    /// Decode a DER SubjectPublicKeyInfo into a verifying key, trying each
    /// supported curve in turn.
    pub fn from_spki_der(der: &[u8]) -> Option<Self> {
        if let Ok(key) = p256::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Some(Self::P256(key));
        }
        if let Ok(key) = p384::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Some(Self::P384(key));
        }
        if let Ok(key) = p521::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Some(Self::P521(key));
        }
        None
    }

    /// Verify an IEEE X9.62 DER signature over SHA-256 of `payload`.
    ///
    /// The digest is SHA-256 for every curve; P-384/P-521 verify it as a
    /// prehash per the ECDSA truncation rules.
    fn verify(&self, payload: &[u8], signature_der: &[u8]) -> bool {
        let digest = Sha256::digest(payload);
        match self {
            Self::P256(key) => p256::ecdsa::Signature::from_der(signature_der)
                .map(|sig| key.verify_prehash(digest.as_slice(), &sig).is_ok())
                .unwrap_or(false),
            Self::P384(key) => p384::ecdsa::Signature::from_der(signature_der)
                .map(|sig| key.verify_prehash(digest.as_slice(), &sig).is_ok())
                .unwrap_or(false),
            Self::P521(key) => p521::ecdsa::Signature::from_der(signature_der)
                .map(|sig| key.verify_prehash(digest.as_slice(), &sig).is_ok())
                .unwrap_or(false),
        }
    }
}

/// Proof that a blob's payload passed verification.
///
/// Only verifiers hand these out, so a policy set can only be decoded from
/// bytes whose signature checked out.
pub struct VerifiedPayload<'a> {
    payload: &'a [u8],
}

impl VerifiedPayload<'_> {
    pub fn bytes(&self) -> &[u8] {
        self.payload
    }
}

/// Common surface of the blob verifiers.
pub trait RemoteConfigVerifier {
    /// Whether the blob's signature is valid under this verifier. Never
    /// panics, never errors.
    fn verify(&self, blob: &RemoteConfigBlob) -> bool;

    /// Verify and, on success, release the payload for decoding.
    fn verified<'a>(&self, blob: &'a RemoteConfigBlob) -> Option<VerifiedPayload<'a>> {
        if self.verify(blob) {
            Some(VerifiedPayload {
                payload: &blob.payload,
            })
        } else {
            None
        }
    }
}

/// Decode a verified payload into a policy set.
pub fn decode_policy_set(verified: &VerifiedPayload<'_>) -> Result<PolicySet, PolicyError> {
    PolicySet::from_json_bytes(verified.bytes())
}

/// HMAC-SHA-256 blob verification.
pub struct HmacConfigVerifier<R> {
    secrets: R,
}

impl<R: SecretResolver> HmacConfigVerifier<R> {
    pub fn new(secrets: R) -> Self {
        Self { secrets }
    }
}

impl<R: SecretResolver> RemoteConfigVerifier for HmacConfigVerifier<R> {
    fn verify(&self, blob: &RemoteConfigBlob) -> bool {
        let SignatureType::HmacSha256 { secret_id } = &blob.signature_type else {
            return false;
        };
        let Some(secret) = self.secrets.secret(secret_id) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&secret) else {
            return false;
        };
        mac.update(&blob.payload);
        let computed = mac.finalize().into_bytes();

        // Constant-time: length check first, then ct_eq over the tags.
        if blob.signature.len() != computed.len() {
            return false;
        }
        computed.as_slice().ct_eq(blob.signature.as_slice()).into()
    }
}

/// ECDSA-over-SHA-256 blob verification.
pub struct PublicKeyConfigVerifier<R> {
    keys: R,
}

impl<R: VerifyingKeyResolver> PublicKeyConfigVerifier<R> {
    pub fn new(keys: R) -> Self {
        Self { keys }
    }
}

impl<R: VerifyingKeyResolver> RemoteConfigVerifier for PublicKeyConfigVerifier<R> {
    fn verify(&self, blob: &RemoteConfigBlob) -> bool {
        let SignatureType::PublicKey { key_id } = &blob.signature_type else {
            return false;
        };
        let Some(key) = self.keys.key(key_id) else {
            return false;
        };
        key.verify(&blob.payload, &blob.signature)
    }
}
