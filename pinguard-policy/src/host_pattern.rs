// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Host patterns and hostname normalisation.

use serde::{Deserialize, Serialize};

/// Normalise a hostname: lowercase, then strip all leading and trailing `.`
/// characters. Interior empty labels are preserved (they simply never match
/// a real label).
pub fn normalize_host(host: &str) -> String {
    host.to_lowercase().trim_matches('.').to_string()
}

/// An exact hostname or a single-level wildcard (`*.suffix`).
///
/// A wildcard matches exactly one additional left-most label:
/// `*.example.com` matches `api.example.com` but neither `example.com` nor
/// `a.b.example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HostPattern {
    Exact(String),
    Wildcard(String),
}

impl HostPattern {
    /// Parse a pattern string.
    ///
    /// The input is normalised first; if the normalised string starts with
    /// `*.`, the remainder (normalised again) is a wildcard suffix,
    /// otherwise the whole string is an exact pattern. Degenerate inputs
    /// like `"*."` or `"*.."` therefore collapse to the exact pattern `*`,
    /// which no real hostname can match.
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize_host(raw);
        match normalized.strip_prefix("*.") {
            Some(suffix) => HostPattern::Wildcard(normalize_host(suffix)),
            None => HostPattern::Exact(normalized),
        }
    }

    /// The canonical string form: the suffix prefixed with `*.` for
    /// wildcards, the normalised host for exact patterns.
    pub fn raw_value(&self) -> String {
        match self {
            HostPattern::Exact(host) => host.clone(),
            HostPattern::Wildcard(suffix) => format!("*.{suffix}"),
        }
    }

    /// Whether this pattern matches the given host. An empty normalised
    /// host never matches.
    pub fn matches(&self, host: &str) -> bool {
        let host = normalize_host(host);
        if host.is_empty() {
            return false;
        }

        match self {
            HostPattern::Exact(pattern) => normalize_host(pattern) == host,
            HostPattern::Wildcard(suffix) => {
                let suffix = normalize_host(suffix);
                let host_labels: Vec<&str> = host.split('.').collect();
                let suffix_labels: Vec<&str> = if suffix.is_empty() {
                    Vec::new()
                } else {
                    suffix.split('.').collect()
                };

                host_labels.len() == suffix_labels.len() + 1
                    && host_labels[1..] == suffix_labels[..]
            }
        }
    }

    /// Specificity used to break ties between matching wildcards: the
    /// length of the wildcard suffix. Exact patterns do not compete on
    /// specificity.
    pub(crate) fn wildcard_specificity(&self) -> Option<usize> {
        match self {
            HostPattern::Exact(_) => None,
            HostPattern::Wildcard(suffix) => Some(suffix.len()),
        }
    }
}

impl From<String> for HostPattern {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<HostPattern> for String {
    fn from(value: HostPattern) -> Self {
        value.raw_value()
    }
}

impl std::fmt::Display for HostPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw_value())
    }
}
