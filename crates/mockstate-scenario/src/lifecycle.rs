//! Scenario lifecycle
//!
//! Template bookkeeping for registered rules, copy-on-first-access
//! materialization of session scenarios, required-state checks and state
//! transitions.
//!
//! [`Scenarios`] is the capability interface; the variant is chosen once at
//! construction:
//! - [`GlobalScenarios`]: session-oblivious, every session maps to the
//!   template namespace
//! - [`SessionAwareScenarios`]: each session gets its own copy of a
//!   template the first time it reads or writes that scenario
//!
//! # Concurrency
//!
//! Store primitives are atomic, but materialize-then-store and the
//! read-modify-write of a transition are two steps. Without
//! [`TransitionLocks`] two requests racing on the same (session, scenario)
//! resolve last-write-wins: racing first accesses write identical seeds,
//! while racing transitions can lose an update. Enabling the locks
//! serializes those sequences per key.

use crate::error::ScenarioError;
use crate::locks::TransitionLocks;
use crate::scenario::{Scenario, ScenarioRule};
use crate::store::{ScenarioKey, ScenarioStore};
use mockstate_session::SessionId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Scenario lifecycle capability
pub trait Scenarios: Send + Sync + std::fmt::Debug {
    /// Whether state is partitioned per session
    fn is_session_aware(&self) -> bool;

    /// Stored scenario for a session, without materializing it
    fn get(&self, session: &SessionId, name: &str) -> Option<Scenario>;

    /// Every stored scenario
    fn all(&self) -> Vec<Scenario>;

    /// Scenarios stored for one session
    fn all_for_session(&self, session: &SessionId) -> Vec<Scenario>;

    /// Sessions holding at least one scenario copy
    fn active_sessions(&self) -> BTreeSet<String>;

    /// Attach a newly registered rule to its template scenario
    fn on_rule_added(&self, rule: &dyn ScenarioRule);

    /// Move a rule between template scenarios after an edit
    ///
    /// # Errors
    /// `ScenarioError::MissingTemplate` if the old rule's template is gone
    fn on_rule_updated(
        &self,
        old: &dyn ScenarioRule,
        new: &dyn ScenarioRule,
    ) -> Result<(), ScenarioError>;

    /// Detach a removed rule, dropping its template once empty
    ///
    /// # Errors
    /// `ScenarioError::MissingTemplate` if the rule's template is gone
    fn on_rule_removed(&self, rule: &dyn ScenarioRule) -> Result<(), ScenarioError>;

    /// Whether a state-gated rule's required state is the session's current
    /// state. Always false for rules that are not state-gated.
    fn matches_required_state(&self, session: &SessionId, rule: &dyn ScenarioRule) -> bool;

    /// Apply the rule's state transition for the session, if it has one
    fn on_rule_served(&self, session: &SessionId, rule: &dyn ScenarioRule);

    /// Return every scenario to the initial state, keeping membership
    fn reset(&self);

    /// Return one session's scenarios to the initial state
    fn reset_session(&self, session: &SessionId);

    /// Return one scenario to the initial state
    ///
    /// # Errors
    /// `ScenarioError::ScenarioNotFound` if no such scenario is registered
    fn reset_single(&self, session: &SessionId, name: &str) -> Result<(), ScenarioError>;

    /// Force one scenario into a state
    ///
    /// # Errors
    /// `ScenarioError::ScenarioNotFound` if no such scenario is registered
    fn set_single(&self, session: &SessionId, name: &str, state: &str)
        -> Result<(), ScenarioError>;

    /// Drop all scenario state, templates included
    fn clear(&self);

    /// Drop one session's scenario state
    fn clear_session(&self, session: &SessionId);
}

/// Shared mechanics of both lifecycle variants
#[derive(Debug)]
struct Lifecycle {
    store: Arc<ScenarioStore>,
    locks: TransitionLocks,
}

impl Lifecycle {
    fn attach(&self, rule: &dyn ScenarioRule) {
        let Some(name) = rule.scenario_name() else {
            return;
        };
        let global = SessionId::global();
        let _guard = self.locks.lock(&ScenarioKey::global(name));

        let template = self.store.get(&global, name).unwrap_or_else(|| {
            tracing::debug!("Created template scenario {}", name);
            Scenario::in_started_state(name)
        });
        self.store
            .put(&global, name, template.with_stub(rule.stub_id()));
    }

    fn detach(&self, rule: &dyn ScenarioRule) -> Result<(), ScenarioError> {
        let Some(name) = rule.scenario_name() else {
            return Ok(());
        };
        let global = SessionId::global();
        let _guard = self.locks.lock(&ScenarioKey::global(name));

        let template = self
            .store
            .get(&global, name)
            .ok_or_else(|| ScenarioError::MissingTemplate {
                scenario: name.to_string(),
            })?
            .without_stub(rule.stub_id());

        if template.is_empty() {
            tracing::debug!("Removed empty template scenario {}", name);
            self.store.remove(&global, name);
        } else {
            self.store.put(&global, name, template);
        }
        Ok(())
    }

    fn update(&self, old: &dyn ScenarioRule, new: &dyn ScenarioRule) -> Result<(), ScenarioError> {
        if let Some(old_name) = old.scenario_name() {
            if new.scenario_name() != Some(old_name) {
                self.detach(old)?;
            }
        }
        self.attach(new);
        Ok(())
    }

    /// Session scenario, seeded from the template on first access.
    ///
    /// Callers hold the stripe for the session key. Without a template the
    /// result is a transient empty scenario that is never stored.
    fn materialize(&self, session: &SessionId, name: &str) -> Scenario {
        if let Some(existing) = self.store.get(session, name) {
            return existing;
        }

        let template = if session.is_global() {
            None
        } else {
            self.store.get(&SessionId::global(), name)
        };

        match template {
            Some(template) => {
                let copy = template.reset();
                tracing::debug!("Materialized scenario {} for session {}", name, session);
                self.store.put(session, name, copy.clone());
                copy
            }
            None => Scenario::in_started_state(name),
        }
    }

    fn matches(&self, session: &SessionId, rule: &dyn ScenarioRule) -> bool {
        let (Some(name), Some(required)) = (rule.scenario_name(), rule.required_state()) else {
            return false;
        };
        let _guard = self.locks.lock(&ScenarioKey::new(session, name));
        self.materialize(session, name).state() == required
    }

    fn served(&self, session: &SessionId, rule: &dyn ScenarioRule) {
        let Some(name) = rule.scenario_name() else {
            return;
        };
        let _guard = self.locks.lock(&ScenarioKey::new(session, name));
        let scenario = self.materialize(session, name);

        let Some(new_state) = rule.new_state() else {
            return;
        };
        if rule
            .required_state()
            .is_some_and(|required| required != scenario.state())
        {
            return;
        }
        if scenario.is_empty() {
            tracing::debug!("Ignoring transition of unregistered scenario {}", name);
            return;
        }

        tracing::info!(
            scenario = name,
            session = %session,
            from = scenario.state(),
            to = new_state,
            "Scenario state transition"
        );
        self.store.put(session, name, scenario.with_state(new_state));
    }

    fn set_state(
        &self,
        session: &SessionId,
        name: &str,
        state: Option<&str>,
    ) -> Result<(), ScenarioError> {
        let _guard = self.locks.lock(&ScenarioKey::new(session, name));
        let scenario = self.materialize(session, name);
        if scenario.is_empty() {
            return Err(ScenarioError::ScenarioNotFound {
                scenario: name.to_string(),
            });
        }

        let scenario = match state {
            Some(state) => scenario.with_state(state),
            None => scenario.reset(),
        };
        tracing::info!(
            "Scenario {} set to {} for session {}",
            name,
            scenario.state(),
            session
        );
        self.store.put(session, name, scenario);
        Ok(())
    }
}

/// Session-oblivious scenarios
///
/// Every session argument is mapped to the template namespace, so template
/// state is the live state for all clients.
#[derive(Debug)]
pub struct GlobalScenarios {
    inner: Lifecycle,
}

impl GlobalScenarios {
    /// Create over a shared store, last-write-wins
    #[inline]
    #[must_use]
    pub fn new(store: Arc<ScenarioStore>) -> Self {
        Self::with_locks(store, TransitionLocks::disabled())
    }

    /// Create over a shared store with the given locks
    #[inline]
    #[must_use]
    pub fn with_locks(store: Arc<ScenarioStore>, locks: TransitionLocks) -> Self {
        Self {
            inner: Lifecycle { store, locks },
        }
    }
}

impl Scenarios for GlobalScenarios {
    fn is_session_aware(&self) -> bool {
        false
    }

    fn get(&self, _session: &SessionId, name: &str) -> Option<Scenario> {
        self.inner.store.get(&SessionId::global(), name)
    }

    fn all(&self) -> Vec<Scenario> {
        self.inner.store.all_for_session(&SessionId::global())
    }

    fn all_for_session(&self, _session: &SessionId) -> Vec<Scenario> {
        self.all()
    }

    fn active_sessions(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn on_rule_added(&self, rule: &dyn ScenarioRule) {
        self.inner.attach(rule);
    }

    fn on_rule_updated(
        &self,
        old: &dyn ScenarioRule,
        new: &dyn ScenarioRule,
    ) -> Result<(), ScenarioError> {
        self.inner.update(old, new)
    }

    fn on_rule_removed(&self, rule: &dyn ScenarioRule) -> Result<(), ScenarioError> {
        self.inner.detach(rule)
    }

    fn matches_required_state(&self, _session: &SessionId, rule: &dyn ScenarioRule) -> bool {
        self.inner.matches(&SessionId::global(), rule)
    }

    fn on_rule_served(&self, _session: &SessionId, rule: &dyn ScenarioRule) {
        self.inner.served(&SessionId::global(), rule);
    }

    fn reset(&self) {
        tracing::info!("Resetting all scenarios");
        self.inner.store.update_all(|_, scenario| scenario.restart());
    }

    fn reset_session(&self, _session: &SessionId) {
        self.reset();
    }

    fn reset_single(&self, _session: &SessionId, name: &str) -> Result<(), ScenarioError> {
        self.inner.set_state(&SessionId::global(), name, None)
    }

    fn set_single(
        &self,
        _session: &SessionId,
        name: &str,
        state: &str,
    ) -> Result<(), ScenarioError> {
        self.inner.set_state(&SessionId::global(), name, Some(state))
    }

    fn clear(&self) {
        self.inner.store.clear_all();
    }

    fn clear_session(&self, _session: &SessionId) {
        self.clear();
    }
}

/// Session-aware scenarios
///
/// Templates live in the global namespace and are only changed by rule
/// registration. Each session reads and advances its own copy, seeded from
/// the template's membership in the initial state on first access.
#[derive(Debug)]
pub struct SessionAwareScenarios {
    inner: Lifecycle,
}

impl SessionAwareScenarios {
    /// Create over a shared store, last-write-wins
    #[inline]
    #[must_use]
    pub fn new(store: Arc<ScenarioStore>) -> Self {
        Self::with_locks(store, TransitionLocks::disabled())
    }

    /// Create over a shared store with the given locks
    #[inline]
    #[must_use]
    pub fn with_locks(store: Arc<ScenarioStore>, locks: TransitionLocks) -> Self {
        Self {
            inner: Lifecycle { store, locks },
        }
    }
}

impl Default for SessionAwareScenarios {
    fn default() -> Self {
        Self::new(Arc::new(ScenarioStore::new()))
    }
}

impl Scenarios for SessionAwareScenarios {
    fn is_session_aware(&self) -> bool {
        true
    }

    fn get(&self, session: &SessionId, name: &str) -> Option<Scenario> {
        self.inner.store.get(session, name)
    }

    fn all(&self) -> Vec<Scenario> {
        self.inner
            .store
            .all()
            .into_iter()
            .map(|(_, scenario)| scenario)
            .collect()
    }

    fn all_for_session(&self, session: &SessionId) -> Vec<Scenario> {
        self.inner.store.all_for_session(session)
    }

    fn active_sessions(&self) -> BTreeSet<String> {
        self.inner.store.active_sessions()
    }

    fn on_rule_added(&self, rule: &dyn ScenarioRule) {
        self.inner.attach(rule);
    }

    fn on_rule_updated(
        &self,
        old: &dyn ScenarioRule,
        new: &dyn ScenarioRule,
    ) -> Result<(), ScenarioError> {
        self.inner.update(old, new)
    }

    fn on_rule_removed(&self, rule: &dyn ScenarioRule) -> Result<(), ScenarioError> {
        self.inner.detach(rule)
    }

    fn matches_required_state(&self, session: &SessionId, rule: &dyn ScenarioRule) -> bool {
        self.inner.matches(session, rule)
    }

    fn on_rule_served(&self, session: &SessionId, rule: &dyn ScenarioRule) {
        self.inner.served(session, rule);
    }

    fn reset(&self) {
        tracing::info!("Resetting scenarios in every namespace");
        self.inner.store.update_all(|_, scenario| scenario.restart());
    }

    fn reset_session(&self, session: &SessionId) {
        tracing::info!("Resetting scenarios for session {}", session);
        self.inner.store.update_session(session, Scenario::restart);
    }

    fn reset_single(&self, session: &SessionId, name: &str) -> Result<(), ScenarioError> {
        self.inner.set_state(session, name, None)
    }

    fn set_single(
        &self,
        session: &SessionId,
        name: &str,
        state: &str,
    ) -> Result<(), ScenarioError> {
        self.inner.set_state(session, name, Some(state))
    }

    fn clear(&self) {
        self.inner.store.clear_all();
    }

    fn clear_session(&self, session: &SessionId) {
        tracing::info!("Clearing scenarios for session {}", session);
        self.inner.store.clear_session(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{StubId, STARTED};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Default)]
    struct Rule {
        id: StubId,
        scenario: Option<String>,
        required: Option<String>,
        new_state: Option<String>,
    }

    impl Rule {
        fn in_scenario(name: &str) -> Self {
            Self {
                scenario: Some(name.to_string()),
                ..Self::default()
            }
        }

        fn when(mut self, state: &str) -> Self {
            self.required = Some(state.to_string());
            self
        }

        fn then(mut self, state: &str) -> Self {
            self.new_state = Some(state.to_string());
            self
        }
    }

    impl ScenarioRule for Rule {
        fn stub_id(&self) -> StubId {
            self.id
        }
        fn scenario_name(&self) -> Option<&str> {
            self.scenario.as_deref()
        }
        fn required_state(&self) -> Option<&str> {
            self.required.as_deref()
        }
        fn new_state(&self) -> Option<&str> {
            self.new_state.as_deref()
        }
    }

    fn session_aware() -> (Arc<ScenarioStore>, SessionAwareScenarios) {
        let store = Arc::new(ScenarioStore::new());
        (Arc::clone(&store), SessionAwareScenarios::new(store))
    }

    fn state_of(scenarios: &dyn Scenarios, session: &SessionId, name: &str) -> Option<String> {
        scenarios.get(session, name).map(|s| s.state().to_string())
    }

    #[test]
    fn added_rule_creates_template() {
        let (store, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").when(STARTED);

        scenarios.on_rule_added(&rule);

        let template = store.get(&SessionId::global(), "flow").unwrap();
        assert_eq!(template.state(), STARTED);
        assert!(template.stub_ids().contains(&rule.id));
        assert!(scenarios.active_sessions().is_empty());
    }

    #[test]
    fn rule_without_scenario_is_ignored() {
        let (store, scenarios) = session_aware();
        scenarios.on_rule_added(&Rule::default());
        scenarios.on_rule_removed(&Rule::default()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn removing_last_member_drops_template() {
        let (store, scenarios) = session_aware();
        let a = Rule::in_scenario("flow");
        let b = Rule::in_scenario("flow");
        scenarios.on_rule_added(&a);
        scenarios.on_rule_added(&b);

        scenarios.on_rule_removed(&a).unwrap();
        assert_eq!(store.get(&SessionId::global(), "flow").unwrap().stub_ids().len(), 1);

        scenarios.on_rule_removed(&b).unwrap();
        assert!(store.get(&SessionId::global(), "flow").is_none());
    }

    #[test]
    fn removing_from_missing_template_is_a_fault() {
        let (_, scenarios) = session_aware();
        let err = scenarios
            .on_rule_removed(&Rule::in_scenario("ghost"))
            .unwrap_err();
        assert!(err.is_internal_fault());
    }

    #[test]
    fn update_moves_rule_between_templates() {
        let (store, scenarios) = session_aware();
        let old = Rule::in_scenario("first");
        scenarios.on_rule_added(&old);

        let new = Rule {
            scenario: Some("second".to_string()),
            ..old.clone()
        };
        scenarios.on_rule_updated(&old, &new).unwrap();

        assert!(store.get(&SessionId::global(), "first").is_none());
        assert!(store
            .get(&SessionId::global(), "second")
            .unwrap()
            .stub_ids()
            .contains(&old.id));
    }

    #[test]
    fn update_within_same_scenario_keeps_membership() {
        let (store, scenarios) = session_aware();
        let old = Rule::in_scenario("flow").when(STARTED);
        scenarios.on_rule_added(&old);

        let new = old.clone().when("Other");
        scenarios.on_rule_updated(&old, &new).unwrap();

        let template = store.get(&SessionId::global(), "flow").unwrap();
        assert_eq!(template.stub_ids().len(), 1);
    }

    #[test]
    fn update_out_of_scenario_detaches() {
        let (store, scenarios) = session_aware();
        let old = Rule::in_scenario("flow");
        scenarios.on_rule_added(&old);

        let new = Rule {
            scenario: None,
            ..old.clone()
        };
        scenarios.on_rule_updated(&old, &new).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn update_from_missing_template_is_a_fault() {
        let (_, scenarios) = session_aware();
        let old = Rule::in_scenario("ghost");
        let new = Rule::in_scenario("real");
        assert!(matches!(
            scenarios.on_rule_updated(&old, &new),
            Err(ScenarioError::MissingTemplate { .. })
        ));
    }

    #[test]
    fn first_access_materializes_session_copy() {
        let (store, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").when(STARTED);
        scenarios.on_rule_added(&rule);
        let session = SessionId::of("a");

        assert!(store.get(&session, "flow").is_none());
        assert!(scenarios.matches_required_state(&session, &rule));

        let copy = store.get(&session, "flow").unwrap();
        assert_eq!(copy.state(), STARTED);
        assert!(copy.stub_ids().contains(&rule.id));
        assert!(scenarios.active_sessions().contains("a"));
    }

    #[test]
    fn copy_is_seeded_in_started_state_even_if_template_moved() {
        let (store, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").when(STARTED);
        scenarios.on_rule_added(&rule);
        scenarios
            .set_single(&SessionId::global(), "flow", "Elsewhere")
            .unwrap();

        let session = SessionId::of("a");
        assert!(scenarios.matches_required_state(&session, &rule));
        assert_eq!(store.get(&session, "flow").unwrap().state(), STARTED);
    }

    #[test]
    fn copy_evolves_independently_of_template_membership() {
        let (store, scenarios) = session_aware();
        let first = Rule::in_scenario("flow").when(STARTED);
        scenarios.on_rule_added(&first);
        let session = SessionId::of("a");
        scenarios.matches_required_state(&session, &first);

        let second = Rule::in_scenario("flow");
        scenarios.on_rule_added(&second);

        assert_eq!(store.get(&SessionId::global(), "flow").unwrap().stub_ids().len(), 2);
        assert_eq!(store.get(&session, "flow").unwrap().stub_ids().len(), 1);
    }

    #[test]
    fn non_gated_rule_never_matches() {
        let (_, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow");
        scenarios.on_rule_added(&rule);
        assert!(!scenarios.matches_required_state(&SessionId::of("a"), &rule));
        assert!(!scenarios.matches_required_state(&SessionId::of("a"), &Rule::default()));
    }

    #[test]
    fn served_transition_is_scoped_to_session() {
        let (_, scenarios) = session_aware();
        let get = Rule::in_scenario("flow").when(STARTED);
        let put = Rule::in_scenario("flow").when(STARTED).then("Confirmed");
        scenarios.on_rule_added(&get);
        scenarios.on_rule_added(&put);

        let a = SessionId::of("a");
        let b = SessionId::of("b");
        scenarios.on_rule_served(&a, &put);

        assert_eq!(state_of(&scenarios, &a, "flow").as_deref(), Some("Confirmed"));
        assert!(!scenarios.matches_required_state(&a, &get));
        assert!(scenarios.matches_required_state(&b, &get));
        assert_eq!(
            state_of(&scenarios, &SessionId::global(), "flow").as_deref(),
            Some(STARTED)
        );
    }

    #[test]
    fn transition_requires_matching_state() {
        let (_, scenarios) = session_aware();
        let put = Rule::in_scenario("flow").when("Other").then("Confirmed");
        scenarios.on_rule_added(&put);
        let a = SessionId::of("a");

        scenarios.on_rule_served(&a, &put);
        assert_eq!(state_of(&scenarios, &a, "flow").as_deref(), Some(STARTED));
    }

    #[test]
    fn transition_without_required_state_always_applies() {
        let (_, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").then("Next");
        scenarios.on_rule_added(&rule);
        let a = SessionId::of("a");

        scenarios.set_single(&a, "flow", "Anything").unwrap();
        scenarios.on_rule_served(&a, &rule);
        assert_eq!(state_of(&scenarios, &a, "flow").as_deref(), Some("Next"));
    }

    #[test]
    fn serving_non_mutating_rule_only_materializes() {
        let (store, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").when(STARTED);
        scenarios.on_rule_added(&rule);
        let a = SessionId::of("a");

        scenarios.on_rule_served(&a, &rule);
        assert_eq!(store.get(&a, "flow").unwrap().state(), STARTED);
    }

    #[test]
    fn unregistered_scenario_is_never_stored() {
        let (store, scenarios) = session_aware();
        let rule = Rule::in_scenario("ghost").when(STARTED).then("Next");
        let a = SessionId::of("a");

        assert!(scenarios.matches_required_state(&a, &rule));
        scenarios.on_rule_served(&a, &rule);
        assert!(store.is_empty());
        assert!(matches!(
            scenarios.set_single(&a, "ghost", "X"),
            Err(ScenarioError::ScenarioNotFound { .. })
        ));
    }

    #[test]
    fn reset_session_leaves_template_and_others() {
        let (_, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").then("Done");
        scenarios.on_rule_added(&rule);
        let a = SessionId::of("a");
        let b = SessionId::of("b");
        scenarios.on_rule_served(&a, &rule);
        scenarios.on_rule_served(&b, &rule);
        scenarios
            .set_single(&SessionId::global(), "flow", "TemplateState")
            .unwrap();

        scenarios.reset_session(&a);

        assert_eq!(state_of(&scenarios, &a, "flow").as_deref(), Some(STARTED));
        assert_eq!(state_of(&scenarios, &b, "flow").as_deref(), Some("Done"));
        assert_eq!(
            state_of(&scenarios, &SessionId::global(), "flow").as_deref(),
            Some("TemplateState")
        );
    }

    #[test]
    fn reset_returns_every_namespace_to_started() {
        let (_, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").then("Done");
        scenarios.on_rule_added(&rule);
        let a = SessionId::of("a");
        scenarios.on_rule_served(&a, &rule);
        scenarios
            .set_single(&SessionId::global(), "flow", "TemplateState")
            .unwrap();

        scenarios.reset();

        assert_eq!(state_of(&scenarios, &a, "flow").as_deref(), Some(STARTED));
        let template = scenarios.get(&SessionId::global(), "flow").unwrap();
        assert_eq!(template.state(), STARTED);
        assert!(template.stub_ids().contains(&rule.id));
    }

    #[test]
    fn reset_single_and_set_single_materialize() {
        let (store, scenarios) = session_aware();
        scenarios.on_rule_added(&Rule::in_scenario("flow"));
        let a = SessionId::of("a");

        scenarios.set_single(&a, "flow", "Custom").unwrap();
        assert_eq!(store.get(&a, "flow").unwrap().state(), "Custom");

        scenarios.reset_single(&a, "flow").unwrap();
        assert_eq!(store.get(&a, "flow").unwrap().state(), STARTED);
    }

    #[test]
    fn clear_session_forgets_copies() {
        let (_, scenarios) = session_aware();
        let rule = Rule::in_scenario("flow").then("Done");
        scenarios.on_rule_added(&rule);
        let a = SessionId::of("a");
        scenarios.on_rule_served(&a, &rule);

        scenarios.clear_session(&a);

        assert!(scenarios.get(&a, "flow").is_none());
        assert!(scenarios.active_sessions().is_empty());
        assert!(scenarios.get(&SessionId::global(), "flow").is_some());
    }

    #[test]
    fn clear_drops_templates() {
        let (store, scenarios) = session_aware();
        scenarios.on_rule_added(&Rule::in_scenario("flow"));
        scenarios.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn global_variant_shares_state_between_sessions() {
        let store = Arc::new(ScenarioStore::new());
        let scenarios = GlobalScenarios::new(Arc::clone(&store));
        let get = Rule::in_scenario("flow").when(STARTED);
        let put = Rule::in_scenario("flow").when(STARTED).then("Confirmed");
        scenarios.on_rule_added(&get);
        scenarios.on_rule_added(&put);

        scenarios.on_rule_served(&SessionId::of("a"), &put);

        assert!(!scenarios.matches_required_state(&SessionId::of("b"), &get));
        assert_eq!(
            store.get(&SessionId::global(), "flow").unwrap().state(),
            "Confirmed"
        );
        assert!(scenarios.active_sessions().is_empty());
        assert_eq!(store.len(), 1);

        scenarios.reset_session(&SessionId::of("b"));
        assert!(scenarios.matches_required_state(&SessionId::of("a"), &get));
    }

    #[test]
    fn global_variant_targets_templates() {
        let store = Arc::new(ScenarioStore::new());
        let scenarios = GlobalScenarios::new(Arc::clone(&store));
        scenarios.on_rule_added(&Rule::in_scenario("flow"));

        scenarios.set_single(&SessionId::of("a"), "flow", "X").unwrap();
        assert_eq!(store.get(&SessionId::global(), "flow").unwrap().state(), "X");

        scenarios.reset_single(&SessionId::of("a"), "flow").unwrap();
        assert_eq!(store.get(&SessionId::global(), "flow").unwrap().state(), STARTED);
        assert_eq!(scenarios.all().len(), 1);
    }
}
