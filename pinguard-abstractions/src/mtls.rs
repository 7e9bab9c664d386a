// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Client-certificate (mTLS) provider boundary.
//!
//! Identity loading is a host concern. The engine never owns identity bytes:
//! it forwards [`crate::PinGuardEvent::MtlsIdentityUsed`] /
//! [`crate::PinGuardEvent::MtlsIdentityMissing`] to its telemetry sink and
//! hands the opaque identity straight back to the transport.

use std::any::Any;
use std::sync::Arc;

/// An opaque client identity handle.
///
/// The payload is whatever the host transport understands (a keychain
/// reference, a parsed PKCS#12 identity, ...). The engine never inspects it.
#[derive(Clone)]
pub struct ClientIdentity {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ClientIdentity {
    pub fn new(identity: impl Any + Send + Sync) -> Self {
        Self {
            inner: Arc::new(identity),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl std::fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientIdentity").finish_non_exhaustive()
    }
}

/// Result of asking the host for a client identity.
#[derive(Debug, Clone)]
pub enum IdentityOutcome {
    /// An identity plus its certificate chain (DER), ready for the
    /// transport's client-certificate response.
    Success {
        identity: ClientIdentity,
        chain_der: Vec<Vec<u8>>,
    },
    /// The stored identity exists but must be renewed before use.
    RenewalRequired,
    /// No identity is available for this host.
    Unavailable,
}

/// Host-side loader invoked when the peer requests a client certificate.
pub trait ClientIdentityProvider: Send + Sync {
    fn provide(&self, host: &str) -> IdentityOutcome;
}

/// Invoked when a provider reports [`IdentityOutcome::RenewalRequired`].
pub type RenewalCallback = Arc<dyn Fn(&str) + Send + Sync>;
