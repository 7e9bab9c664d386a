// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Policy resolution: pick the single policy that applies to a host.

use crate::host_pattern::{normalize_host, HostPattern};
use crate::policy::{PinningPolicy, PolicySet};

impl PolicySet {
    /// Resolve the policy governing `host`.
    ///
    /// 1. An empty normalised host resolves to nothing.
    /// 2. The first matching exact pattern wins, regardless of wildcards.
    /// 3. Otherwise the matching wildcard with the longest suffix wins;
    ///    ties go to the earliest declaration.
    /// 4. Otherwise the set's default policy (which may be absent).
    pub fn resolve(&self, host: &str) -> Option<&PinningPolicy> {
        let host = normalize_host(host);
        if host.is_empty() {
            return None;
        }

        if let Some(exact) = self
            .policies
            .iter()
            .find(|hp| matches!(hp.pattern, HostPattern::Exact(_)) && hp.pattern.matches(&host))
        {
            return Some(&exact.policy);
        }

        let mut best: Option<(&PinningPolicy, usize)> = None;
        for host_policy in &self.policies {
            let Some(specificity) = host_policy.pattern.wildcard_specificity() else {
                continue;
            };
            if !host_policy.pattern.matches(&host) {
                continue;
            }
            // Strictly-greater keeps the first declaration on ties.
            if best.map_or(true, |(_, current)| specificity > current) {
                best = Some((&host_policy.policy, specificity));
            }
        }

        best.map(|(policy, _)| policy)
            .or(self.default_policy.as_ref())
    }
}
