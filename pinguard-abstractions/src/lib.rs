// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared interfaces and datatypes for the PinGuard certificate-pinning crates.
//!
//! This crate exists to prevent circular dependencies across:
//! - the high-level facade (`pinguard`)
//! - the policy model and resolver (`pinguard-policy`)
//! - the hashing and summarisation layer (`pinguard-x509`)
//! - the trust evaluator (`pinguard-trust`)
//!
//! It is intentionally kept small and stable: pins, chain adaptor traits,
//! the event/decision vocabulary, and the mTLS provider boundary.

pub mod chain;
pub mod events;
pub mod mtls;
pub mod pin;

pub use chain::{
    CertificateScope, ChainCertificate, PublicKeyAlgorithm, PublicKeyMaterial, SystemTrustEvaluator,
    SystemTrustOutcome,
};
pub use events::{ChainSummary, PinGuardEvent, Reason, TelemetrySink, TrustDecision};
pub use mtls::{ClientIdentity, ClientIdentityProvider, IdentityOutcome, RenewalCallback};
pub use pin::{Pin, PinEncodingError, PinHash, PinRole, PinScope, PinType};
