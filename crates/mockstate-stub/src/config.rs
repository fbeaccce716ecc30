//! Top-level configuration and wiring

use crate::registry::StubRegistry;
use crate::selector::StubSelector;
use mockstate_scenario::{build_scenarios, ScenarioConfig, ScenarioStore};
use mockstate_session::{SessionConfig, SessionResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session resolution plus scenario lifecycle settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockstateConfig {
    /// Session header and cookie names
    pub session: SessionConfig,
    /// Scenario lifecycle variant and locking
    pub scenarios: ScenarioConfig,
}

impl MockstateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With session settings
    #[inline]
    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// With scenario settings
    #[inline]
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: ScenarioConfig) -> Self {
        self.scenarios = scenarios;
        self
    }
}

impl<M> StubSelector<M> {
    /// Wire an empty store, lifecycle, registry and resolver from `config`
    #[must_use]
    pub fn from_config(config: &MockstateConfig, matcher: M) -> Self {
        let scenarios = build_scenarios(&config.scenarios, Arc::new(ScenarioStore::new()));
        let registry = Arc::new(StubRegistry::new(scenarios));
        Self::new(
            registry,
            SessionResolver::new(config.session.clone()),
            matcher,
        )
    }
}
