// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Registry semantics: initial state, swap-only updates, per-call
//! snapshots, and mTLS event forwarding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pinguard::{
    ClientIdentity, ClientIdentityProvider, Configuration, Environment, EnvironmentConfig,
    FailStrategy, HostPattern, HostPolicy, IdentityOutcome, PinGuard, PinGuardEvent,
    PinningPolicy, PolicySet, Reason, TelemetrySink,
};

fn permissive_set(pattern: &str) -> PolicySet {
    PolicySet::new(
        vec![HostPolicy::new(
            HostPattern::parse(pattern),
            PinningPolicy::new(Vec::new(), FailStrategy::Permissive),
        )],
        None,
    )
}

#[test]
fn initial_state_reports_missing_policies() {
    let registry = PinGuard::new();
    let decision = registry.evaluate(&[], &true.into(), "api.example.com");

    assert!(!decision.is_trusted);
    assert_eq!(decision.reason, Reason::PolicyMissing);
}

#[test]
fn update_replaces_the_whole_configuration() {
    let registry = PinGuard::new();
    registry.configure(|builder| {
        builder
            .policy_set(Environment::dev(), permissive_set("*.example.com"))
            .current(Environment::dev())
    });

    assert!(
        registry
            .evaluate(&[], &true.into(), "api.example.com")
            .is_trusted
    );

    // A replacement without the dev environment drops its policies.
    registry.configure(|builder| {
        builder
            .policy_set(Environment::prod(), permissive_set("*.other.test"))
            .current(Environment::prod())
    });

    assert_eq!(
        registry
            .evaluate(&[], &true.into(), "api.example.com")
            .reason,
        Reason::PolicyMissing
    );
}

#[test]
fn selecting_an_unregistered_environment_leaves_the_empty_set_active() {
    let registry = PinGuard::new();
    registry.configure(|builder| {
        builder
            .policy_set(Environment::dev(), permissive_set("*.example.com"))
            .current(Environment::new("staging-eu").unwrap())
    });

    assert_eq!(
        registry
            .evaluate(&[], &true.into(), "api.example.com")
            .reason,
        Reason::PolicyMissing
    );
}

#[test]
fn custom_environment_identifiers_are_legal_and_empty_ones_are_not() {
    Environment::new("staging-eu").unwrap();
    assert!(Environment::new("").is_err());
    assert!(Environment::new("a\nb").is_err());
    assert_eq!(Environment::prod().as_str(), "prod");
}

#[test]
fn evaluation_uses_one_snapshot_for_policy_and_sink() {
    let events: Arc<Mutex<Vec<PinGuardEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let sink: TelemetrySink = Arc::new(move |event: &PinGuardEvent| {
        sink_events.lock().unwrap().push(event.clone());
    });

    let registry = PinGuard::new();
    registry.configure(|builder| {
        builder
            .policy_set(Environment::prod(), permissive_set("*.example.com"))
            .current(Environment::prod())
            .telemetry_sink(sink)
    });

    let decision = registry.evaluate(&[], &true.into(), "api.example.com");
    assert_eq!(*events.lock().unwrap(), decision.events);
}

#[test]
fn concurrent_updates_and_evaluations_stay_consistent() {
    let registry = Arc::new(PinGuard::new());
    registry.configure(|builder| {
        builder
            .policy_set(Environment::prod(), permissive_set("*.example.com"))
            .current(Environment::prod())
    });

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let configuration = Configuration::builder()
                        .policy_set(Environment::prod(), permissive_set("*.example.com"))
                        .current(Environment::prod())
                        .build();
                    registry.update(configuration);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    // Every snapshot is a complete configuration, so the
                    // decision is always the same.
                    let decision = registry.evaluate(&[], &true.into(), "api.example.com");
                    assert!(decision.is_trusted);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
}

#[test]
fn shared_registry_is_one_instance() {
    let a = PinGuard::shared() as *const PinGuard;
    let b = PinGuard::shared() as *const PinGuard;
    assert_eq!(a, b);
}

struct FixedProvider {
    outcome: &'static str,
    calls: AtomicUsize,
}

impl ClientIdentityProvider for FixedProvider {
    fn provide(&self, _host: &str) -> IdentityOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            "success" => IdentityOutcome::Success {
                identity: ClientIdentity::new("opaque-handle"),
                chain_der: vec![vec![0x30]],
            },
            "renewal" => IdentityOutcome::RenewalRequired,
            _ => IdentityOutcome::Unavailable,
        }
    }
}

fn registry_with_provider(
    provider: Arc<FixedProvider>,
    sink: TelemetrySink,
    renewals: Arc<Mutex<Vec<String>>>,
) -> PinGuard {
    let registry = PinGuard::new();
    let callback_renewals = Arc::clone(&renewals);
    registry.configure(|builder| {
        builder
            .environment(
                Environment::prod(),
                EnvironmentConfig::new(permissive_set("*.example.com"))
                    .with_mtls_provider(provider)
                    .with_renewal_callback(Arc::new(move |host: &str| {
                        callback_renewals.lock().unwrap().push(host.to_string());
                    })),
            )
            .current(Environment::prod())
            .telemetry_sink(sink)
    });
    registry
}

fn collecting_sink() -> (TelemetrySink, Arc<Mutex<Vec<PinGuardEvent>>>) {
    let events: Arc<Mutex<Vec<PinGuardEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let sink: TelemetrySink = Arc::new(move |event: &PinGuardEvent| {
        sink_events.lock().unwrap().push(event.clone());
    });
    (sink, events)
}

#[test]
fn successful_identity_emits_the_used_event() {
    let provider = Arc::new(FixedProvider {
        outcome: "success",
        calls: AtomicUsize::new(0),
    });
    let (sink, events) = collecting_sink();
    let registry = registry_with_provider(Arc::clone(&provider), sink, Default::default());

    let outcome = registry.provide_client_identity("API.example.com");
    assert!(matches!(outcome, IdentityOutcome::Success { .. }));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *events.lock().unwrap(),
        vec![PinGuardEvent::MtlsIdentityUsed {
            host: "api.example.com".to_string()
        }]
    );
}

#[test]
fn renewal_required_invokes_the_callback() {
    let provider = Arc::new(FixedProvider {
        outcome: "renewal",
        calls: AtomicUsize::new(0),
    });
    let (sink, events) = collecting_sink();
    let renewals: Arc<Mutex<Vec<String>>> = Default::default();
    let registry = registry_with_provider(provider, sink, Arc::clone(&renewals));

    let outcome = registry.provide_client_identity("api.example.com");
    assert!(matches!(outcome, IdentityOutcome::RenewalRequired));
    assert_eq!(*renewals.lock().unwrap(), vec!["api.example.com".to_string()]);
    assert_eq!(
        *events.lock().unwrap(),
        vec![PinGuardEvent::MtlsIdentityMissing {
            host: "api.example.com".to_string()
        }]
    );
}

#[test]
fn missing_provider_reports_identity_missing() {
    let (sink, events) = collecting_sink();
    let registry = PinGuard::new();
    registry.configure(|builder| {
        builder
            .policy_set(Environment::prod(), permissive_set("*.example.com"))
            .current(Environment::prod())
            .telemetry_sink(sink)
    });

    let outcome = registry.provide_client_identity("api.example.com");
    assert!(matches!(outcome, IdentityOutcome::Unavailable));
    assert_eq!(
        *events.lock().unwrap(),
        vec![PinGuardEvent::MtlsIdentityMissing {
            host: "api.example.com".to_string()
        }]
    );
}
