// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The process-wide configuration registry.
//!
//! Mutation is swap-only: the registry holds an `Arc` to an immutable
//! [`Configuration`], readers clone the `Arc` under a read lock, and
//! `update` replaces the whole value under the write lock. One evaluation
//! therefore sees a single consistent snapshot of policy set, telemetry
//! sink, and mTLS wiring, and concurrent updates linearise on the lock.

use std::sync::Arc;
use std::sync::OnceLock;

use parking_lot::RwLock;
use pinguard_abstractions::{
    ChainCertificate, IdentityOutcome, PinGuardEvent, SystemTrustOutcome, TrustDecision,
};
use pinguard_policy::normalize_host;
use pinguard_trust::TrustEvaluator;

use crate::configuration::{Configuration, ConfigurationBuilder};

/// The certificate-pinning engine registry.
pub struct PinGuard {
    configuration: RwLock<Arc<Configuration>>,
}

impl PinGuard {
    /// A registry with the initial configuration: no environments, no
    /// current selection, an empty active policy set.
    pub fn new() -> Self {
        Self {
            configuration: RwLock::new(Arc::new(Configuration::default())),
        }
    }

    /// The process-wide default instance.
    ///
    /// Applications that prefer injection construct their own registries;
    /// this one exists as a well-known rendezvous point.
    pub fn shared() -> &'static PinGuard {
        static SHARED: OnceLock<PinGuard> = OnceLock::new();
        SHARED.get_or_init(PinGuard::new)
    }

    /// Build a configuration with the fluent builder and install it.
    pub fn configure(&self, f: impl FnOnce(ConfigurationBuilder) -> ConfigurationBuilder) {
        self.update(f(Configuration::builder()).build());
    }

    /// Atomically replace the active configuration.
    pub fn update(&self, configuration: Configuration) {
        tracing::debug!(
            environment = configuration
                .current_environment()
                .map(|e| e.as_str())
                .unwrap_or("<none>"),
            "replacing pinning configuration"
        );
        *self.configuration.write() = Arc::new(configuration);
    }

    /// A snapshot of the active configuration.
    pub fn current_configuration(&self) -> Arc<Configuration> {
        self.configuration.read().clone()
    }

    /// Evaluate a presented chain for `host` under the active environment's
    /// policy set.
    ///
    /// The configuration is snapshotted once; a concurrent `update` affects
    /// only later evaluations.
    pub fn evaluate(
        &self,
        chain: &[&dyn ChainCertificate],
        system_trust: &SystemTrustOutcome,
        host: &str,
    ) -> TrustDecision {
        let snapshot = self.current_configuration();
        let evaluator = TrustEvaluator::new(snapshot.active_policy_set(), snapshot.telemetry_sink());
        evaluator.evaluate(chain, system_trust, host)
    }

    /// Ask the active environment's mTLS provider for a client identity,
    /// forwarding the identity events to the telemetry sink.
    ///
    /// The engine never holds identity material; whatever the provider
    /// returns goes straight back to the transport.
    pub fn provide_client_identity(&self, host: &str) -> IdentityOutcome {
        let snapshot = self.current_configuration();
        let host = normalize_host(host);

        let emit = |event: PinGuardEvent| {
            if let Some(sink) = snapshot.telemetry_sink() {
                sink(&event);
            }
        };

        let Some(provider) = snapshot.active_mtls_provider() else {
            emit(PinGuardEvent::MtlsIdentityMissing { host });
            return IdentityOutcome::Unavailable;
        };

        match provider.provide(&host) {
            outcome @ IdentityOutcome::Success { .. } => {
                emit(PinGuardEvent::MtlsIdentityUsed { host });
                outcome
            }
            IdentityOutcome::RenewalRequired => {
                if let Some(callback) = snapshot.active_renewal_callback() {
                    callback(&host);
                }
                emit(PinGuardEvent::MtlsIdentityMissing { host });
                IdentityOutcome::RenewalRequired
            }
            IdentityOutcome::Unavailable => {
                emit(PinGuardEvent::MtlsIdentityMissing { host });
                IdentityOutcome::Unavailable
            }
        }
    }
}

impl Default for PinGuard {
    fn default() -> Self {
        Self::new()
    }
}
