// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Immutable engine configuration.
//!
//! A configuration maps environments to their policy sets (plus optional
//! mTLS wiring) and names the environment currently in force. It is a pure
//! value: changing anything means building a new configuration and swapping
//! it into the registry whole.

use std::collections::HashMap;
use std::sync::Arc;

use pinguard_abstractions::{ClientIdentityProvider, RenewalCallback, TelemetrySink};
use pinguard_policy::PolicySet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("environment identifiers must be non-empty printable strings")]
    InvalidEnvironment,
}

/// A deployment environment identifier.
///
/// `dev`, `uat`, and `prod` exist as presets for convenience; they carry no
/// semantics beyond their names, and any other non-empty printable string
/// is equally valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment(String);

impl Environment {
    pub fn dev() -> Self {
        Self("dev".to_string())
    }

    pub fn uat() -> Self {
        Self("uat".to_string())
    }

    pub fn prod() -> Self {
        Self("prod".to_string())
    }

    /// A custom environment identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(|c| c.is_control()) {
            return Err(ConfigurationError::InvalidEnvironment);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything registered for one environment.
#[derive(Clone, Default)]
pub struct EnvironmentConfig {
    pub policy_set: PolicySet,
    pub mtls_provider: Option<Arc<dyn ClientIdentityProvider>>,
    pub on_renewal_required: Option<RenewalCallback>,
}

impl EnvironmentConfig {
    pub fn new(policy_set: PolicySet) -> Self {
        Self {
            policy_set,
            mtls_provider: None,
            on_renewal_required: None,
        }
    }

    pub fn with_mtls_provider(mut self, provider: Arc<dyn ClientIdentityProvider>) -> Self {
        self.mtls_provider = Some(provider);
        self
    }

    pub fn with_renewal_callback(mut self, callback: RenewalCallback) -> Self {
        self.on_renewal_required = Some(callback);
        self
    }
}

impl std::fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("policy_set", &self.policy_set)
            .field("mtls_provider", &self.mtls_provider.is_some())
            .field("on_renewal_required", &self.on_renewal_required.is_some())
            .finish()
    }
}

/// The full engine configuration.
#[derive(Clone, Default)]
pub struct Configuration {
    environments: HashMap<Environment, EnvironmentConfig>,
    current: Option<Environment>,
    telemetry_sink: Option<TelemetrySink>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn current_environment(&self) -> Option<&Environment> {
        self.current.as_ref()
    }

    pub fn environment(&self, environment: &Environment) -> Option<&EnvironmentConfig> {
        self.environments.get(environment)
    }

    fn current_config(&self) -> Option<&EnvironmentConfig> {
        self.current.as_ref().and_then(|c| self.environments.get(c))
    }

    /// The policy set in force. With no current environment registered this
    /// is the empty set, so every evaluation reports a missing policy.
    pub fn active_policy_set(&self) -> &PolicySet {
        static EMPTY: PolicySet = PolicySet {
            policies: Vec::new(),
            default_policy: None,
        };
        self.current_config()
            .map(|config| &config.policy_set)
            .unwrap_or(&EMPTY)
    }

    pub fn telemetry_sink(&self) -> Option<&TelemetrySink> {
        self.telemetry_sink.as_ref()
    }

    pub fn active_mtls_provider(&self) -> Option<&Arc<dyn ClientIdentityProvider>> {
        self.current_config()
            .and_then(|config| config.mtls_provider.as_ref())
    }

    pub fn active_renewal_callback(&self) -> Option<&RenewalCallback> {
        self.current_config()
            .and_then(|config| config.on_renewal_required.as_ref())
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("environments", &self.environments)
            .field("current", &self.current)
            .field("telemetry_sink", &self.telemetry_sink.is_some())
            .finish()
    }
}

/// Fluent builder for [`Configuration`].
#[derive(Default)]
pub struct ConfigurationBuilder {
    configuration: Configuration,
}

impl ConfigurationBuilder {
    /// Register an environment with its full configuration.
    pub fn environment(mut self, environment: Environment, config: EnvironmentConfig) -> Self {
        self.configuration.environments.insert(environment, config);
        self
    }

    /// Register an environment carrying only a policy set.
    pub fn policy_set(self, environment: Environment, policy_set: PolicySet) -> Self {
        self.environment(environment, EnvironmentConfig::new(policy_set))
    }

    /// Select the environment in force.
    pub fn current(mut self, environment: Environment) -> Self {
        self.configuration.current = Some(environment);
        self
    }

    pub fn telemetry_sink(mut self, sink: TelemetrySink) -> Self {
        self.configuration.telemetry_sink = Some(sink);
        self
    }

    pub fn build(self) -> Configuration {
        self.configuration
    }
}
