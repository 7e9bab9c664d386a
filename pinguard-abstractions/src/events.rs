// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trust decisions and the evaluation event vocabulary.
//!
//! Every adverse condition the evaluator encounters is folded into one of
//! the [`Reason`] variants; diagnostic detail travels through the ordered
//! [`PinGuardEvent`] log instead of error types. Events are appended to the
//! returned decision and streamed to an optional [`TelemetrySink`] in
//! emission order, synchronously on the evaluating thread.

use std::sync::Arc;

use crate::pin::Pin;

/// Redacted, best-effort summary of a presented chain.
///
/// Common names are redacted to `"*." + last-two-labels` (lowercased);
/// values with fewer than two labels redact to `None`. This is telemetry
/// only and never a trust input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSummary {
    pub leaf_common_name: Option<String>,
    pub issuer_common_name: Option<String>,
    pub san_count: u32,
}

/// An event emitted during trust evaluation.
///
/// Hosts carried by events are already normalised (lowercased, outer dots
/// stripped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinGuardEvent {
    PolicyMissing {
        host: String,
    },
    SystemTrustEvaluated {
        host: String,
        is_trusted: bool,
    },
    SystemTrustFailed {
        host: String,
        error_text: Option<String>,
    },
    SystemTrustFailedPermissive {
        host: String,
    },
    ChainSummarized {
        host: String,
        summary: ChainSummary,
    },
    PinMatched {
        host: String,
        matched_pins: Vec<Pin>,
    },
    PinMismatch {
        host: String,
    },
    PinMismatchAllowedByFallback {
        host: String,
    },
    PinMismatchPermissive {
        host: String,
    },
    PinSetEmpty {
        host: String,
    },
    MtlsIdentityUsed {
        host: String,
    },
    MtlsIdentityMissing {
        host: String,
    },
}

impl PinGuardEvent {
    /// The normalised host this event concerns.
    pub fn host(&self) -> &str {
        match self {
            PinGuardEvent::PolicyMissing { host }
            | PinGuardEvent::SystemTrustEvaluated { host, .. }
            | PinGuardEvent::SystemTrustFailed { host, .. }
            | PinGuardEvent::SystemTrustFailedPermissive { host }
            | PinGuardEvent::ChainSummarized { host, .. }
            | PinGuardEvent::PinMatched { host, .. }
            | PinGuardEvent::PinMismatch { host }
            | PinGuardEvent::PinMismatchAllowedByFallback { host }
            | PinGuardEvent::PinMismatchPermissive { host }
            | PinGuardEvent::PinSetEmpty { host }
            | PinGuardEvent::MtlsIdentityUsed { host }
            | PinGuardEvent::MtlsIdentityMissing { host } => host,
        }
    }
}

/// Why a trust decision came out the way it did.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Reason {
    /// At least one pin matched a chain candidate.
    PinMatch,
    /// Trust was granted on the system verdict alone, without pinning.
    SystemTrustAllowed,
    /// System trust failed but the policy is permissive.
    SystemTrustFailedPermissive,
    /// No pin matched, but the policy allows falling back to system trust.
    PinMismatchAllowedByFallback,
    /// No pin matched, but the policy is permissive and the system trusts
    /// the chain.
    PinMismatchPermissive,
    /// Required system trust failed under a strict policy.
    TrustFailed,
    /// No policy applies to the host.
    PolicyMissing,
    /// No pin matched and no fallback applies.
    PinningFailed,
}

impl Reason {
    /// Whether a decision carrying this reason trusts the connection.
    pub fn grants_trust(self) -> bool {
        matches!(
            self,
            Reason::PinMatch
                | Reason::SystemTrustAllowed
                | Reason::SystemTrustFailedPermissive
                | Reason::PinMismatchAllowedByFallback
                | Reason::PinMismatchPermissive
        )
    }
}

/// Outcome of one trust evaluation.
///
/// `is_trusted` is derived from the reason at construction, so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustDecision {
    pub is_trusted: bool,
    pub reason: Reason,
    pub events: Vec<PinGuardEvent>,
}

impl TrustDecision {
    pub fn new(reason: Reason, events: Vec<PinGuardEvent>) -> Self {
        Self {
            is_trusted: reason.grants_trust(),
            reason,
            events,
        }
    }
}

/// Fire-and-forget observer for evaluation events.
///
/// Sinks are invoked inline on the evaluating thread and may be called
/// concurrently from different threads; implementations synchronise
/// themselves and must be re-entrancy safe.
pub type TelemetrySink = Arc<dyn Fn(&PinGuardEvent) + Send + Sync>;
