// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Pinning policies and policy sets.

use pinguard_abstractions::{Pin, PinEncodingError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host_pattern::HostPattern;

/// Fail-closed vs fail-open behaviour when system-trust or pin checks fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailStrategy {
    Strict,
    Permissive,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("pin {index}: {source}")]
    InvalidPin {
        index: usize,
        source: PinEncodingError,
    },

    #[error("pins {first} and {second} share type and hash within the same scope")]
    DuplicatePin { first: usize, second: usize },

    #[error("policy data could not be decoded: {0}")]
    Decode(String),
}

/// The pinning rules applied to one host (or a set of hosts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinningPolicy {
    /// Pins in declared order. An empty list is legal; it is reported as a
    /// distinct event during evaluation and falls through to the
    /// fallback/permissive cascade.
    #[serde(default)]
    pub pins: Vec<Pin>,
    pub fail_strategy: FailStrategy,
    #[serde(default)]
    pub require_system_trust: bool,
    #[serde(default)]
    pub allow_system_trust_fallback: bool,
}

impl PinningPolicy {
    pub fn new(pins: Vec<Pin>, fail_strategy: FailStrategy) -> Self {
        Self {
            pins,
            fail_strategy,
            require_system_trust: false,
            allow_system_trust_fallback: false,
        }
    }

    pub fn with_require_system_trust(mut self, require: bool) -> Self {
        self.require_system_trust = require;
        self
    }

    pub fn with_system_trust_fallback(mut self, allow: bool) -> Self {
        self.allow_system_trust_fallback = allow;
        self
    }

    /// Validate policy semantics.
    ///
    /// Two pins may share `(type, hash)` only if their scopes differ, and
    /// every pin hash must be canonical base64 SHA-256.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (index, pin) in self.pins.iter().enumerate() {
            pinguard_abstractions::PinHash::validated(pin.hash.as_str())
                .map_err(|source| PolicyError::InvalidPin { index, source })?;

            for (earlier_index, earlier) in self.pins[..index].iter().enumerate() {
                if earlier.pin_type == pin.pin_type
                    && earlier.hash == pin.hash
                    && earlier.scope == pin.scope
                {
                    return Err(PolicyError::DuplicatePin {
                        first: earlier_index,
                        second: index,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A host pattern bound to the policy that governs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPolicy {
    pub pattern: HostPattern,
    pub policy: PinningPolicy,
}

impl HostPolicy {
    pub fn new(pattern: HostPattern, policy: PinningPolicy) -> Self {
        Self { pattern, policy }
    }
}

/// An ordered collection of host policies plus an optional default.
///
/// Order is significant: resolution returns the first matching exact
/// pattern, and the first among equally-specific matching wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySet {
    #[serde(default)]
    pub policies: Vec<HostPolicy>,
    #[serde(default)]
    pub default_policy: Option<PinningPolicy>,
}

impl PolicySet {
    pub fn new(policies: Vec<HostPolicy>, default_policy: Option<PinningPolicy>) -> Self {
        Self {
            policies,
            default_policy,
        }
    }

    /// An empty set: no host policies, no default.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate every contained policy.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for host_policy in &self.policies {
            host_policy.policy.validate()?;
        }
        if let Some(default) = &self.default_policy {
            default.validate()?;
        }
        Ok(())
    }

    /// Parse from the JSON policy-data encoding, then validate.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let set: Self =
            serde_json::from_str(json).map_err(|e| PolicyError::Decode(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    /// Parse from JSON bytes, then validate.
    pub fn from_json_bytes(json: &[u8]) -> Result<Self, PolicyError> {
        let set: Self =
            serde_json::from_slice(json).map_err(|e| PolicyError::Decode(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    /// Export to the JSON policy-data encoding.
    pub fn to_json(&self) -> Result<String, PolicyError> {
        serde_json::to_string(self).map_err(|e| PolicyError::Decode(e.to_string()))
    }
}
