//! Stub mappings
//!
//! A [`StubMapping`] pairs a request pattern with a response definition and
//! optional scenario gating. The JSON form follows the WireMock mapping
//! format (`scenarioName`, `requiredScenarioState`, `newScenarioState`).

use mockstate_scenario::{ScenarioRule, StubId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Request pattern handed to the request matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPattern {
    /// HTTP method, or `ANY`
    pub method: String,
    /// Exact request URL
    pub url: String,
}

impl RequestPattern {
    /// Create pattern for method and URL
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }
}

/// Response handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDefinition {
    /// HTTP status
    #[serde(default = "default_status")]
    pub status: u16,
    /// Response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: None,
        }
    }
}

/// Registered request-pattern to response association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMapping {
    /// Registration identity
    #[serde(default)]
    pub id: StubId,

    /// Lower is served first; unset sorts after every explicit priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    /// Scenario the stub belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,

    /// Scenario state the stub is gated on
    #[serde(
        default,
        rename = "requiredScenarioState",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_state: Option<String>,

    /// Scenario state to move to once served
    #[serde(
        default,
        rename = "newScenarioState",
        skip_serializing_if = "Option::is_none"
    )]
    pub new_state: Option<String>,

    /// Request pattern
    pub request: RequestPattern,

    /// Response definition
    #[serde(default)]
    pub response: ResponseDefinition,

    /// Registration order, assigned by the registry
    #[serde(skip)]
    pub(crate) insertion_index: u64,
}

impl StubMapping {
    /// Create ungated stub with a fresh id
    #[must_use]
    pub fn new(request: RequestPattern, response: ResponseDefinition) -> Self {
        Self {
            id: StubId::new(),
            priority: None,
            scenario_name: None,
            required_state: None,
            new_state: None,
            request,
            response,
            insertion_index: 0,
        }
    }

    /// With explicit id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: StubId) -> Self {
        self.id = id;
        self
    }

    /// With priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// With response status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.response.status = status;
        self
    }

    /// With response body
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.response.body = Some(body.into());
        self
    }

    /// In scenario
    #[inline]
    #[must_use]
    pub fn in_scenario(mut self, name: impl Into<String>) -> Self {
        self.scenario_name = Some(name.into());
        self
    }

    /// Gated on scenario state
    #[inline]
    #[must_use]
    pub fn when_state_is(mut self, state: impl Into<String>) -> Self {
        self.required_state = Some(state.into());
        self
    }

    /// Transitions scenario state when served
    #[inline]
    #[must_use]
    pub fn will_set_state_to(mut self, state: impl Into<String>) -> Self {
        self.new_state = Some(state.into());
        self
    }

    /// Registration order; later registrations are larger
    #[inline]
    #[must_use]
    pub fn insertion_index(&self) -> u64 {
        self.insertion_index
    }

    /// Sort key within a tier: explicit priorities first, ascending, then
    /// most recently registered
    #[inline]
    #[must_use]
    pub fn selection_key(&self) -> (bool, u32, Reverse<u64>) {
        (
            self.priority.is_none(),
            self.priority.unwrap_or_default(),
            Reverse(self.insertion_index),
        )
    }
}

impl ScenarioRule for StubMapping {
    fn stub_id(&self) -> StubId {
        self.id
    }

    fn scenario_name(&self) -> Option<&str> {
        self.scenario_name.as_deref()
    }

    fn required_state(&self) -> Option<&str> {
        self.required_state.as_deref()
    }

    fn new_state(&self) -> Option<&str> {
        self.new_state.as_deref()
    }
}
