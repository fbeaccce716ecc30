//! Scenario-aware stub selection
//!
//! Among the stubs that match a request textually, stubs gated on the
//! caller's current scenario state form the first tier. Only when that tier
//! is empty do ungated stubs compete. Within a tier the lowest explicit
//! priority wins, then the most recent registration.

use crate::mapping::StubMapping;
use crate::matcher::RequestMatcher;
use crate::registry::StubRegistry;
use mockstate_scenario::{ScenarioRule, Scenarios};
use mockstate_session::{SessionCookie, SessionId, SessionResolver, SessionSource};
use std::sync::Arc;
use tracing::debug;

/// Outcome of selecting a stub for one request
#[derive(Debug, Clone)]
pub struct Selection {
    /// Session the request was attributed to
    pub session: SessionId,
    /// Winning stub, if any
    pub stub: Option<Arc<StubMapping>>,
    /// Cookie to issue when the session was minted for this request
    pub set_cookie: Option<SessionCookie>,
}

impl Selection {
    /// Check if a stub was selected
    #[inline]
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.stub.is_some()
    }
}

/// Pick the winner among textually matching `candidates`
///
/// Gated candidates whose required state differs from the session's
/// current state are excluded outright; they never fall back to the
/// ungated tier.
#[must_use]
pub fn select_winner(
    scenarios: &dyn Scenarios,
    session: &SessionId,
    candidates: Vec<Arc<StubMapping>>,
) -> Option<Arc<StubMapping>> {
    let mut gated = Vec::new();
    let mut ungated = Vec::new();
    for stub in candidates {
        if stub.is_state_gated() {
            if scenarios.matches_required_state(session, &*stub) {
                gated.push(stub);
            }
        } else {
            ungated.push(stub);
        }
    }

    debug!(
        "Session {}: {} state-matching, {} ungated candidates",
        session,
        gated.len(),
        ungated.len()
    );

    let tier = if gated.is_empty() { ungated } else { gated };
    tier.into_iter().min_by_key(|stub| stub.selection_key())
}

/// Resolves sessions, selects stubs and applies served transitions
#[derive(Debug)]
pub struct StubSelector<M> {
    registry: Arc<StubRegistry>,
    resolver: SessionResolver,
    matcher: M,
}

impl<M> StubSelector<M> {
    /// Create selector
    #[must_use]
    pub fn new(registry: Arc<StubRegistry>, resolver: SessionResolver, matcher: M) -> Self {
        Self {
            registry,
            resolver,
            matcher,
        }
    }

    /// Stub registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<StubRegistry> {
        &self.registry
    }

    /// Session resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Scenario lifecycle behind the registry
    #[inline]
    #[must_use]
    pub fn scenarios(&self) -> &Arc<dyn Scenarios> {
        self.registry.scenarios()
    }

    /// Select the stub that would serve `request`, without side effects on
    /// scenario state beyond first-access materialization
    pub fn select<Q>(&self, request: &Q) -> Selection
    where
        Q: SessionSource + ?Sized,
        M: RequestMatcher<Q>,
    {
        let session = self.resolver.resolve(request);
        let candidates: Vec<_> = self
            .registry
            .all()
            .into_iter()
            .filter(|stub| self.matcher.matches(request, stub))
            .collect();

        let stub = select_winner(self.scenarios().as_ref(), &session, candidates);
        match &stub {
            Some(stub) => debug!("Selected stub {} for session {}", stub.id, session),
            None => debug!("No stub matched for session {}", session),
        }

        let set_cookie = self.resolver.cookie_for(&session);
        Selection {
            session,
            stub,
            set_cookie,
        }
    }

    /// Apply the winning stub's transition, if it has one
    pub fn mark_served(&self, selection: &Selection) {
        if let Some(stub) = &selection.stub {
            self.scenarios().on_rule_served(&selection.session, &**stub);
        }
    }

    /// Select and mark served
    pub fn serve<Q>(&self, request: &Q) -> Selection
    where
        Q: SessionSource + ?Sized,
        M: RequestMatcher<Q>,
    {
        let selection = self.select(request);
        self.mark_served(&selection);
        selection
    }
}
