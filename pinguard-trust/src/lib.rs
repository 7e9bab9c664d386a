// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trust evaluation.
//!
//! [`TrustEvaluator`] is a deterministic state machine: given a presented
//! chain, the host platform's trust verdict, a target hostname, and a
//! policy set, it produces exactly one [`TrustDecision`] with an ordered
//! event log. It never returns an error; every adverse condition folds into
//! one of the decision reasons.
//!
//! [`TrustDecision`]: pinguard_abstractions::TrustDecision

pub mod chain;
pub mod evaluator;

pub use chain::{derive_candidates, CertificateCandidate};
pub use evaluator::TrustEvaluator;
