//! Session-partitioned scenario store
//!
//! Provides [`ScenarioStore`], mapping (session, scenario name) to a
//! [`Scenario`] record.
//!
//! Keys are a genuine tuple ([`ScenarioKey`]) rather than a concatenated
//! string, so a session token or scenario name containing the `::` display
//! separator can never alias another namespace.

use crate::scenario::Scenario;
use dashmap::{DashMap, DashSet};
use mockstate_session::SessionId;
use std::collections::BTreeSet;

/// Namespace a scenario entry lives in
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    /// Template namespace, shared by every session
    Global,
    /// Copy owned by one client session
    Session(String),
}

impl Namespace {
    /// Namespace addressed by a session id
    #[must_use]
    pub fn of(session: &SessionId) -> Self {
        if session.is_global() {
            Self::Global
        } else {
            Self::Session(session.value().to_string())
        }
    }

    /// Session id addressing this namespace
    #[must_use]
    pub fn session(&self) -> SessionId {
        match self {
            Self::Global => SessionId::global(),
            Self::Session(value) => SessionId::of(value.clone()),
        }
    }
}

/// Store key: (namespace, scenario name)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScenarioKey {
    /// Owning namespace
    pub namespace: Namespace,
    /// Scenario name
    pub name: String,
}

impl ScenarioKey {
    /// Key for a scenario in a session's namespace
    #[must_use]
    pub fn new(session: &SessionId, name: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::of(session),
            name: name.into(),
        }
    }

    /// Key for a template scenario
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::Global,
            name: name.into(),
        }
    }

    /// Whether the key addresses a template
    #[inline]
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.namespace == Namespace::Global
    }
}

/// Serialized form: `name` for templates, `session::name` otherwise
impl std::fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Namespace::Global => f.write_str(&self.name),
            Namespace::Session(session) => write!(f, "{}::{}", session, self.name),
        }
    }
}

/// Concurrent scenario store
///
/// Every method is a single atomic step on the backing map; none of them
/// can fail. Callers composing a read with a dependent write get no
/// atomicity across the pair.
#[derive(Debug, Default)]
pub struct ScenarioStore {
    /// (namespace, name) -> scenario
    entries: DashMap<ScenarioKey, Scenario>,

    /// Non-global sessions with at least one entry
    active_sessions: DashSet<String>,
}

impl ScenarioStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            active_sessions: DashSet::new(),
        }
    }

    /// Lookup a scenario
    #[must_use]
    pub fn get(&self, session: &SessionId, name: &str) -> Option<Scenario> {
        self.entries
            .get(&ScenarioKey::new(session, name))
            .map(|entry| entry.value().clone())
    }

    /// Insert or replace a scenario
    ///
    /// Records the session as active unless it is the global one.
    pub fn put(&self, session: &SessionId, name: &str, scenario: Scenario) {
        self.entries.insert(ScenarioKey::new(session, name), scenario);
        if !session.is_global() {
            self.active_sessions.insert(session.value().to_string());
        }
    }

    /// Remove a scenario, returning it if it was present
    pub fn remove(&self, session: &SessionId, name: &str) -> Option<Scenario> {
        self.entries
            .remove(&ScenarioKey::new(session, name))
            .map(|(_, scenario)| scenario)
    }

    /// Every entry in every namespace
    #[must_use]
    pub fn all(&self) -> Vec<(ScenarioKey, Scenario)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Entries of one namespace, sorted by scenario name
    ///
    /// The global session yields only templates.
    #[must_use]
    pub fn all_for_session(&self, session: &SessionId) -> Vec<Scenario> {
        let namespace = Namespace::of(session);
        let mut scenarios: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| entry.key().namespace == namespace)
            .map(|entry| entry.value().clone())
            .collect();
        scenarios.sort_by(|a, b| a.name().cmp(b.name()));
        scenarios
    }

    /// Apply `f` in place to every entry
    pub fn update_all(&self, mut f: impl FnMut(&ScenarioKey, &mut Scenario)) {
        for mut entry in self.entries.iter_mut() {
            let (key, scenario) = entry.pair_mut();
            f(key, scenario);
        }
    }

    /// Apply `f` in place to every entry of one namespace
    pub fn update_session(&self, session: &SessionId, mut f: impl FnMut(&mut Scenario)) {
        let namespace = Namespace::of(session);
        for mut entry in self.entries.iter_mut() {
            let (key, scenario) = entry.pair_mut();
            if key.namespace == namespace {
                f(scenario);
            }
        }
    }

    /// Remove every entry of one namespace
    ///
    /// Clearing the global session removes templates only.
    pub fn clear_session(&self, session: &SessionId) {
        let namespace = Namespace::of(session);
        self.entries.retain(|key, _| key.namespace != namespace);
        if !session.is_global() {
            self.active_sessions.remove(session.value());
        }
    }

    /// Remove every entry and forget every session
    pub fn clear_all(&self) {
        self.entries.clear();
        self.active_sessions.clear();
    }

    /// Snapshot of active (non-global) sessions
    #[must_use]
    pub fn active_sessions(&self) -> BTreeSet<String> {
        self.active_sessions
            .iter()
            .map(|session| session.key().clone())
            .collect()
    }

    /// Check if a session has been recorded as active
    #[inline]
    #[must_use]
    pub fn has_session(&self, session: &str) -> bool {
        self.active_sessions.contains(session)
    }

    /// Get total entry count
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{StubId, STARTED};
    use pretty_assertions::assert_eq;

    fn scenario(name: &str) -> Scenario {
        Scenario::in_started_state(name).with_stub(StubId::new())
    }

    #[test]
    fn put_and_get_per_namespace() {
        let store = ScenarioStore::new();
        let session = SessionId::of("abc");

        store.put(&SessionId::global(), "flow", scenario("flow"));
        store.put(&session, "flow", scenario("flow").with_state("Confirmed"));

        assert_eq!(store.get(&SessionId::global(), "flow").unwrap().state(), STARTED);
        assert_eq!(store.get(&session, "flow").unwrap().state(), "Confirmed");
        assert!(store.get(&SessionId::of("other"), "flow").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn put_records_only_real_sessions() {
        let store = ScenarioStore::new();
        store.put(&SessionId::global(), "flow", scenario("flow"));
        assert!(store.active_sessions().is_empty());

        store.put(&SessionId::of("a"), "flow", scenario("flow"));
        store.put(&SessionId::of("b"), "flow", scenario("flow"));

        let expected: BTreeSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(store.active_sessions(), expected);
        assert!(store.has_session("a"));
    }

    #[test]
    fn remove_returns_entry() {
        let store = ScenarioStore::new();
        store.put(&SessionId::global(), "flow", scenario("flow"));

        assert!(store.remove(&SessionId::global(), "flow").is_some());
        assert!(store.remove(&SessionId::global(), "flow").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn all_for_session_is_partitioned_and_sorted() {
        let store = ScenarioStore::new();
        let session = SessionId::of("abc");

        store.put(&SessionId::global(), "zeta", scenario("zeta"));
        store.put(&SessionId::global(), "alpha", scenario("alpha"));
        store.put(&session, "beta", scenario("beta"));

        let templates: Vec<_> = store
            .all_for_session(&SessionId::global())
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(templates, vec!["alpha", "zeta"]);

        let copies = store.all_for_session(&session);
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].name(), "beta");
    }

    #[test]
    fn separator_in_names_does_not_alias() {
        let store = ScenarioStore::new();

        // "a::b" as a template name vs. scenario "b" in session "a"
        store.put(&SessionId::global(), "a::b", scenario("a::b"));
        store.put(&SessionId::of("a"), "b", scenario("b").with_state("Other"));

        assert_eq!(store.get(&SessionId::global(), "a::b").unwrap().state(), STARTED);
        assert_eq!(store.all_for_session(&SessionId::global()).len(), 1);
        assert_eq!(store.all_for_session(&SessionId::of("a")).len(), 1);

        store.clear_session(&SessionId::of("a"));
        assert!(store.get(&SessionId::global(), "a::b").is_some());
    }

    #[test]
    fn clear_session_drops_entries_and_activity() {
        let store = ScenarioStore::new();
        let a = SessionId::of("a");
        let b = SessionId::of("b");

        store.put(&SessionId::global(), "flow", scenario("flow"));
        store.put(&a, "flow", scenario("flow"));
        store.put(&a, "other", scenario("other"));
        store.put(&b, "flow", scenario("flow"));

        store.clear_session(&a);

        assert!(store.all_for_session(&a).is_empty());
        assert!(!store.has_session("a"));
        assert!(store.has_session("b"));
        assert!(store.get(&SessionId::global(), "flow").is_some());
    }

    #[test]
    fn clear_global_session_drops_templates_only() {
        let store = ScenarioStore::new();
        let a = SessionId::of("a");
        store.put(&SessionId::global(), "flow", scenario("flow"));
        store.put(&a, "flow", scenario("flow"));

        store.clear_session(&SessionId::global());

        assert!(store.get(&SessionId::global(), "flow").is_none());
        assert!(store.get(&a, "flow").is_some());
        assert!(store.has_session("a"));
    }

    #[test]
    fn clear_all_wipes_everything() {
        let store = ScenarioStore::new();
        store.put(&SessionId::global(), "flow", scenario("flow"));
        store.put(&SessionId::of("a"), "flow", scenario("flow"));

        store.clear_all();

        assert!(store.is_empty());
        assert!(store.active_sessions().is_empty());
    }

    #[test]
    fn update_session_touches_one_namespace() {
        let store = ScenarioStore::new();
        let a = SessionId::of("a");
        store.put(&SessionId::global(), "flow", scenario("flow").with_state("X"));
        store.put(&a, "flow", scenario("flow").with_state("X"));

        store.update_session(&a, Scenario::restart);

        assert_eq!(store.get(&a, "flow").unwrap().state(), STARTED);
        assert_eq!(store.get(&SessionId::global(), "flow").unwrap().state(), "X");
    }

    #[test]
    fn key_display_uses_separator() {
        assert_eq!(ScenarioKey::global("flow").to_string(), "flow");
        assert_eq!(
            ScenarioKey::new(&SessionId::of("abc"), "flow").to_string(),
            "abc::flow"
        );
    }
}
