// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The trust-decision state machine.

use pinguard_abstractions::{
    ChainCertificate, Pin, PinGuardEvent, PinType, Reason, SystemTrustOutcome, TelemetrySink,
    TrustDecision,
};
use pinguard_policy::{normalize_host, FailStrategy, PinningPolicy, PolicySet};
use pinguard_x509::summarize_chain;

use crate::chain::{derive_candidates, CertificateCandidate};

/// Ordered event accumulation with inline sink streaming.
struct EventLog<'a> {
    events: Vec<PinGuardEvent>,
    sink: Option<&'a TelemetrySink>,
}

impl<'a> EventLog<'a> {
    fn new(sink: Option<&'a TelemetrySink>) -> Self {
        Self {
            events: Vec::new(),
            sink,
        }
    }

    fn emit(&mut self, event: PinGuardEvent) {
        if let Some(sink) = self.sink {
            sink(&event);
        }
        self.events.push(event);
    }

    fn into_decision(self, reason: Reason) -> TrustDecision {
        TrustDecision::new(reason, self.events)
    }
}

/// Evaluates chains against a policy set.
///
/// Evaluation is synchronous and runs entirely on the calling thread; the
/// only shared state is the borrowed policy set and sink, both of which the
/// caller snapshots for the duration of one decision.
pub struct TrustEvaluator<'a> {
    policy_set: &'a PolicySet,
    sink: Option<&'a TelemetrySink>,
}

impl<'a> TrustEvaluator<'a> {
    pub fn new(policy_set: &'a PolicySet, sink: Option<&'a TelemetrySink>) -> Self {
        Self { policy_set, sink }
    }

    /// Decide whether to trust `chain` for `host`.
    ///
    /// `system_trust` is the host platform's verdict over the same chain.
    /// The hostname is normalised once on entry; every emitted event carries
    /// the normalised form.
    pub fn evaluate(
        &self,
        chain: &[&dyn ChainCertificate],
        system_trust: &SystemTrustOutcome,
        host: &str,
    ) -> TrustDecision {
        let host = normalize_host(host);
        let mut log = EventLog::new(self.sink);

        let Some(policy) = self.policy_set.resolve(&host) else {
            log.emit(PinGuardEvent::PolicyMissing { host: host.clone() });
            let decision = log.into_decision(Reason::PolicyMissing);
            tracing::debug!(%host, reason = ?decision.reason, "no pinning policy applies");
            return decision;
        };

        log.emit(PinGuardEvent::SystemTrustEvaluated {
            host: host.clone(),
            is_trusted: system_trust.is_trusted,
        });

        if policy.require_system_trust && !system_trust.is_trusted {
            let decision = if policy.fail_strategy == FailStrategy::Permissive {
                log.emit(PinGuardEvent::SystemTrustFailedPermissive { host: host.clone() });
                log.into_decision(Reason::SystemTrustFailedPermissive)
            } else {
                log.emit(PinGuardEvent::SystemTrustFailed {
                    host: host.clone(),
                    error_text: system_trust.error_text.clone(),
                });
                log.into_decision(Reason::TrustFailed)
            };
            tracing::debug!(%host, reason = ?decision.reason, "system trust failed");
            return decision;
        }

        let candidates = derive_candidates(chain);
        log.emit(PinGuardEvent::ChainSummarized {
            host: host.clone(),
            summary: summarize_chain(chain),
        });

        let matched = if policy.pins.is_empty() {
            log.emit(PinGuardEvent::PinSetEmpty { host: host.clone() });
            Vec::new()
        } else {
            matching_pins(policy, &candidates)
        };

        if !matched.is_empty() {
            log.emit(PinGuardEvent::PinMatched {
                host: host.clone(),
                matched_pins: matched,
            });
            let decision = log.into_decision(Reason::PinMatch);
            tracing::debug!(%host, reason = ?decision.reason, "pin matched");
            return decision;
        }

        let decision = if policy.allow_system_trust_fallback && system_trust.is_trusted {
            log.emit(PinGuardEvent::PinMismatchAllowedByFallback { host: host.clone() });
            log.into_decision(Reason::PinMismatchAllowedByFallback)
        } else if policy.fail_strategy == FailStrategy::Permissive && system_trust.is_trusted {
            log.emit(PinGuardEvent::PinMismatchPermissive { host: host.clone() });
            log.into_decision(Reason::PinMismatchPermissive)
        } else {
            log.emit(PinGuardEvent::PinMismatch { host: host.clone() });
            log.into_decision(Reason::PinningFailed)
        };
        tracing::debug!(%host, reason = ?decision.reason, "no pin matched");
        decision
    }
}

/// Pins, in declared order, that have at least one matching candidate.
fn matching_pins(policy: &PinningPolicy, candidates: &[CertificateCandidate]) -> Vec<Pin> {
    policy
        .pins
        .iter()
        .filter(|pin| candidates.iter().any(|candidate| pin_matches(pin, candidate)))
        .cloned()
        .collect()
}

fn pin_matches(pin: &Pin, candidate: &CertificateCandidate) -> bool {
    if !candidate.scope.contains(pin.scope) {
        return false;
    }

    match pin.pin_type {
        // The empty-hash guard keeps a pin with an empty (malformed) hash
        // from colliding with a candidate whose key failed to hash.
        PinType::Spki => {
            !candidate.spki_hash.is_empty() && candidate.spki_hash == pin.hash.as_str()
        }
        PinType::Certificate => candidate.certificate_hash == pin.hash.as_str(),
        PinType::Ca => {
            candidate.scope.is_ca() && candidate.certificate_hash == pin.hash.as_str()
        }
    }
}
