//! Scenario lifecycle configuration

use crate::lifecycle::{GlobalScenarios, Scenarios, SessionAwareScenarios};
use crate::locks::TransitionLocks;
use crate::store::ScenarioStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Scenario lifecycle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Partition scenario state per client session
    pub session_aware: bool,
    /// Serialize updates per (session, scenario) with striped locks
    pub serialize_transitions: bool,
    /// Stripe count when transitions are serialized
    pub lock_stripes: usize,
}

impl ScenarioConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With session awareness on or off
    #[inline]
    #[must_use]
    pub fn with_session_aware(mut self, session_aware: bool) -> Self {
        self.session_aware = session_aware;
        self
    }

    /// With per-key serialization of scenario updates
    #[inline]
    #[must_use]
    pub fn with_serialized_transitions(mut self, lock_stripes: usize) -> Self {
        self.serialize_transitions = true;
        self.lock_stripes = lock_stripes;
        self
    }

    /// Locks matching this configuration
    #[must_use]
    pub fn transition_locks(&self) -> TransitionLocks {
        if self.serialize_transitions {
            TransitionLocks::new(self.lock_stripes)
        } else {
            TransitionLocks::disabled()
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            session_aware: true,
            serialize_transitions: false,
            lock_stripes: 64,
        }
    }
}

/// Build the lifecycle variant selected by `config` over a shared store
#[must_use]
pub fn build_scenarios(config: &ScenarioConfig, store: Arc<ScenarioStore>) -> Arc<dyn Scenarios> {
    let locks = config.transition_locks();
    tracing::debug!(
        "Building {} scenarios (serialized transitions: {})",
        if config.session_aware { "session-aware" } else { "global" },
        locks.is_enabled()
    );
    if config.session_aware {
        Arc::new(SessionAwareScenarios::with_locks(store, locks))
    } else {
        Arc::new(GlobalScenarios::with_locks(store, locks))
    }
}
