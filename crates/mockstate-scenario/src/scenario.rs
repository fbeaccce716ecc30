//! Scenario records
//!
//! A [`Scenario`] is the same record type in every namespace; whether it is
//! a template or a session copy is decided only by its store key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Initial state of every scenario
pub const STARTED: &str = "Started";

/// Stable registration identity of a stub mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StubId(pub Uuid);

impl StubId {
    /// Generate new stub ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StubId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StubId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scenario fields of a rule, as consumed by the lifecycle
pub trait ScenarioRule {
    /// Registration identity
    fn stub_id(&self) -> StubId;

    /// Scenario the rule belongs to
    fn scenario_name(&self) -> Option<&str>;

    /// State the scenario must be in for the rule to be eligible
    fn required_state(&self) -> Option<&str>;

    /// State the scenario moves to once the rule is served
    fn new_state(&self) -> Option<&str>;

    /// Rule declares a scenario
    #[inline]
    fn is_in_scenario(&self) -> bool {
        self.scenario_name().is_some()
    }

    /// Rule declares a scenario and a required state
    #[inline]
    fn is_state_gated(&self) -> bool {
        self.is_in_scenario() && self.required_state().is_some()
    }

    /// Serving the rule requests a state transition
    #[inline]
    fn modifies_state(&self) -> bool {
        self.new_state().is_some()
    }
}

/// Named scenario with its current state and member stubs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    name: String,
    state: String,
    stub_ids: BTreeSet<StubId>,
}

impl Scenario {
    /// Empty scenario in the initial state
    #[must_use]
    pub fn in_started_state(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: STARTED.to_string(),
            stub_ids: BTreeSet::new(),
        }
    }

    /// Scenario name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Member stubs
    #[inline]
    #[must_use]
    pub fn stub_ids(&self) -> &BTreeSet<StubId> {
        &self.stub_ids
    }

    /// Whether the scenario has no members left (and must not be stored)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stub_ids.is_empty()
    }

    /// Whether the scenario is still in its initial state
    #[inline]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state == STARTED
    }

    /// Add a member stub
    #[must_use]
    pub fn with_stub(mut self, id: StubId) -> Self {
        self.stub_ids.insert(id);
        self
    }

    /// Remove a member stub
    #[must_use]
    pub fn without_stub(mut self, id: StubId) -> Self {
        self.stub_ids.remove(&id);
        self
    }

    /// Move to another state
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Fresh copy in the initial state with the same members
    #[must_use]
    pub fn reset(self) -> Self {
        self.with_state(STARTED)
    }

    /// Return to the initial state in place
    #[inline]
    pub fn restart(&mut self) {
        STARTED.clone_into(&mut self.state);
    }
}
