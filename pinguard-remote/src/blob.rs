// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The remote-configuration wire format.
//!
//! A blob is three fields: opaque payload bytes, signature bytes, and the
//! signature scheme with its key identifier. The JSON encoding carries the
//! byte fields as base64 strings; equality is field-wise byte equality.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("remote-config blob could not be decoded: {0}")]
    Decode(String),

    #[error("remote-config blob could not be encoded: {0}")]
    Encode(String),
}

/// Which scheme signed the blob, and under which identifier the verifier
/// should look up its secret or key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureType {
    HmacSha256 { secret_id: String },
    PublicKey { key_id: String },
}

/// A signed configuration payload.
///
/// The payload stays opaque bytes until verification has succeeded; its
/// schema (typically an encoded policy set) is a concern of
/// [`crate::decode_policy_set`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfigBlob {
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    pub signature_type: SignatureType,
}

impl RemoteConfigBlob {
    pub fn new(payload: Vec<u8>, signature: Vec<u8>, signature_type: SignatureType) -> Self {
        Self {
            payload,
            signature,
            signature_type,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, BlobError> {
        serde_json::from_str(json).map_err(|e| BlobError::Decode(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, BlobError> {
        serde_json::to_string(self).map_err(|e| BlobError::Encode(e.to_string()))
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(d)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
