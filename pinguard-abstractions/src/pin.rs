// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Pin datatypes.
//!
//! A pin is a base64-encoded SHA-256 digest used as a trust anchor against a
//! specific certificate or public key. Pins are immutable value data; the
//! policy model and the evaluator both consume them by reference.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the pinned hash covers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinType {
    /// SHA-256 of the SubjectPublicKeyInfo structure.
    Spki,
    /// SHA-256 of the full DER-encoded certificate.
    Certificate,
    /// SHA-256 of a CA certificate (intermediate or root positions only).
    Ca,
}

/// Advisory role of a pin within a policy. Does not affect matching.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinRole {
    Primary,
    Backup,
}

/// Which chain position is eligible to match a pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinScope {
    Leaf,
    Intermediate,
    Root,
    Any,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinEncodingError {
    #[error("pin hash is not valid base64: {0}")]
    NotBase64(String),

    #[error("pin hash decodes to {actual} bytes, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
}

/// An opaque pin hash string.
///
/// The canonical representation is base64-encoded SHA-256 (32 bytes, 44
/// characters with padding). [`PinHash::validated`] enforces the canonical
/// form eagerly; [`PinHash::new`] accepts any string, in which case a
/// malformed hash simply never matches a chain candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinHash(String);

impl PinHash {
    /// Length in bytes of the digest a pin hash encodes.
    pub const DIGEST_LEN: usize = 32;

    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Construct a pin hash, rejecting input that is not base64 of a
    /// 32-byte digest.
    pub fn validated(hash: impl Into<String>) -> Result<Self, PinEncodingError> {
        use base64::Engine as _;

        let hash = hash.into();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(hash.as_bytes())
            .map_err(|e| PinEncodingError::NotBase64(e.to_string()))?;
        if decoded.len() != Self::DIGEST_LEN {
            return Err(PinEncodingError::WrongLength {
                expected: Self::DIGEST_LEN,
                actual: decoded.len(),
            });
        }
        Ok(Self(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PinHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PinHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PinHash {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An immutable trust anchor: hash type, hash value, advisory role, and the
/// chain positions eligible to match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(rename = "type")]
    pub pin_type: PinType,
    pub hash: PinHash,
    pub role: PinRole,
    pub scope: PinScope,
}

impl Pin {
    pub fn new(pin_type: PinType, hash: impl Into<PinHash>, role: PinRole, scope: PinScope) -> Self {
        Self {
            pin_type,
            hash: hash.into(),
            role,
            scope,
        }
    }

    /// Construct a pin with eager hash validation.
    pub fn validated(
        pin_type: PinType,
        hash: impl Into<String>,
        role: PinRole,
        scope: PinScope,
    ) -> Result<Self, PinEncodingError> {
        Ok(Self {
            pin_type,
            hash: PinHash::validated(hash)?,
            role,
            scope,
        })
    }
}
