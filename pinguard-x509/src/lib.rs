// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Certificate hashing and summarisation.
//!
//! This crate computes the two digests pinning compares against:
//! - `certificate_hash`: base64 SHA-256 of the DER-encoded certificate.
//! - `spki_hash`: base64 SHA-256 of a SubjectPublicKeyInfo structure
//!   assembled from a hard-coded AlgorithmIdentifier fragment plus the
//!   key's external representation.
//!
//! It also extracts a redacted, best-effort [`ChainSummary`] for telemetry
//! (leaf/issuer common name, SAN count) and provides [`DerCertificate`], a
//! chain adaptor backed by `x509-parser` for hosts without a platform
//! certificate type.
//!
//! [`ChainSummary`]: pinguard_abstractions::ChainSummary

pub mod adaptor;
pub mod san;
pub mod spki;
pub mod summary;

pub use adaptor::{CertificateError, DerCertificate};
pub use san::count_subject_alt_names;
pub use spki::{assemble_spki, certificate_hash, spki_hash, SpkiError};
pub use summary::{redact_common_name, safe_common_name, safe_issuer_common_name, summarize_chain};
