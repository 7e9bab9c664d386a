// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! High-level certificate-pinning facade.
//!
//! This crate ties the engine together: applications register a
//! [`Configuration`] (per-environment policy sets, an optional telemetry
//! sink, an optional mTLS provider) with a [`PinGuard`] registry, then ask
//! it to [`evaluate`](PinGuard::evaluate) each presented chain.
//!
//! ```
//! use pinguard::{
//!     Environment, FailStrategy, HostPattern, HostPolicy, PinGuard, PinningPolicy, PolicySet,
//! };
//!
//! let registry = PinGuard::new();
//! registry.configure(|builder| {
//!     builder
//!         .policy_set(
//!             Environment::prod(),
//!             PolicySet::new(
//!                 vec![HostPolicy::new(
//!                     HostPattern::parse("*.example.com"),
//!                     PinningPolicy::new(Vec::new(), FailStrategy::Permissive),
//!                 )],
//!                 None,
//!             ),
//!         )
//!         .current(Environment::prod())
//! });
//!
//! let decision = registry.evaluate(&[], &true.into(), "api.example.com");
//! assert!(decision.is_trusted);
//! ```

pub mod configuration;
pub mod registry;

pub use configuration::{
    Configuration, ConfigurationBuilder, ConfigurationError, Environment, EnvironmentConfig,
};
pub use registry::PinGuard;

pub use pinguard_abstractions::{
    CertificateScope, ChainCertificate, ChainSummary, ClientIdentity, ClientIdentityProvider,
    IdentityOutcome, Pin, PinGuardEvent, PinHash, PinRole, PinScope, PinType, Reason,
    RenewalCallback, SystemTrustEvaluator, SystemTrustOutcome, TelemetrySink, TrustDecision,
};
pub use pinguard_policy::{FailStrategy, HostPattern, HostPolicy, PinningPolicy, PolicySet};
pub use pinguard_remote as remote;
pub use pinguard_trust::TrustEvaluator;
pub use pinguard_x509::DerCertificate;
