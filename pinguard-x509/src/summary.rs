// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Redacted chain summaries.
//!
//! Common names never leave this module un-redacted: the summary keeps only
//! `"*." + last-two-labels` of any name, and values with fewer than two
//! labels disappear entirely. The issuer lookup is a heuristic over chain
//! order and is telemetry only, never a trust input.

use pinguard_abstractions::{ChainCertificate, ChainSummary};

use crate::san::count_subject_alt_names;

/// Redact a subject summary string to `"*." + last-two-labels`, lowercased.
/// Returns `None` for strings with fewer than two dot-separated labels.
pub fn redact_common_name(summary: &str) -> Option<String> {
    let lowered = summary.to_lowercase();
    let labels: Vec<&str> = lowered.split('.').collect();
    if labels.len() < 2 {
        return None;
    }
    Some(format!(
        "*.{}.{}",
        labels[labels.len() - 2],
        labels[labels.len() - 1]
    ))
}

/// The redacted common name of one certificate, if its host adaptor
/// exposes a subject summary at all.
pub fn safe_common_name(cert: &dyn ChainCertificate) -> Option<String> {
    cert.subject_summary()
        .as_deref()
        .and_then(redact_common_name)
}

/// The redacted common name of the leaf's issuer.
///
/// The issuer is the certificate immediately following the leaf in the
/// chain, located by byte-equal DER comparison; when the leaf is not found
/// but the chain has at least two entries, index 1 is assumed. Without any
/// issuer candidate the leaf's own subject is redacted instead.
pub fn safe_issuer_common_name(
    leaf: &dyn ChainCertificate,
    chain: &[&dyn ChainCertificate],
) -> Option<String> {
    let leaf_der = leaf.der();
    let issuer = match chain.iter().position(|cert| cert.der() == leaf_der) {
        Some(index) => chain.get(index + 1).copied(),
        None if chain.len() >= 2 => chain.get(1).copied(),
        None => None,
    };

    match issuer {
        Some(cert) => safe_common_name(cert),
        None => safe_common_name(leaf),
    }
}

/// Build the redacted summary for a presented chain. An empty chain yields
/// the default (all-empty) summary.
pub fn summarize_chain(chain: &[&dyn ChainCertificate]) -> ChainSummary {
    let Some(leaf) = chain.first() else {
        return ChainSummary::default();
    };

    ChainSummary {
        leaf_common_name: safe_common_name(*leaf),
        issuer_common_name: safe_issuer_common_name(*leaf, chain),
        san_count: count_subject_alt_names(leaf.der()),
    }
}
