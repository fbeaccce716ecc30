//! Replay scripts
//!
//! A script is a YAML list of steps. Each step is either a request or one
//! admin action:
//!
//! ```yaml
//! steps:
//!   - request: { method: PUT, url: /order, headers: { X-WireMock-Session-Id: a } }
//!   - request: { url: /order, headers: { X-WireMock-Session-Id: a }, expect: confirmed }
//!   - reset_session: a
//!   - set_state: { session: a, scenario: OrderFlow, state: Confirmed }
//!   - clear_session: a
//!   - reset_all: true
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

/// Parsed replay script
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Script {
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Request issued by a replay step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestStep {
    /// HTTP method
    #[serde(default = "default_method")]
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Request cookies
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// Send back the most recently issued session cookie
    #[serde(default)]
    pub use_issued_cookie: bool,
    /// Expected response body
    #[serde(default)]
    pub expect: Option<String>,
    /// Expected response status
    #[serde(default)]
    pub expect_status: Option<u16>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Targeted scenario state override
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetState {
    /// Session to modify
    pub session: String,
    /// Scenario name
    pub scenario: String,
    /// New state
    pub state: String,
}

/// One replay step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawStep")]
pub enum Step {
    /// Issue a request
    Request(RequestStep),
    /// Reset every scenario in every session
    ResetAll,
    /// Reset one session's scenarios
    ResetSession(String),
    /// Force a session's scenario into a state
    SetState(SetState),
    /// Forget one session's scenarios
    ClearSession(String),
}

impl Step {
    /// Short label for output
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::ResetAll => "reset_all",
            Self::ResetSession(_) => "reset_session",
            Self::SetState(_) => "set_state",
            Self::ClearSession(_) => "clear_session",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    #[serde(default)]
    request: Option<RequestStep>,
    #[serde(default)]
    reset_all: bool,
    #[serde(default)]
    reset_session: Option<String>,
    #[serde(default)]
    set_state: Option<SetState>,
    #[serde(default)]
    clear_session: Option<String>,
}

impl TryFrom<RawStep> for Step {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let mut actions = Vec::new();
        if let Some(request) = raw.request {
            actions.push(Self::Request(request));
        }
        if raw.reset_all {
            actions.push(Self::ResetAll);
        }
        if let Some(session) = raw.reset_session {
            actions.push(Self::ResetSession(session));
        }
        if let Some(set_state) = raw.set_state {
            actions.push(Self::SetState(set_state));
        }
        if let Some(session) = raw.clear_session {
            actions.push(Self::ClearSession(session));
        }

        match actions.len() {
            1 => Ok(actions.remove(0)),
            0 => Err("step has no action".to_string()),
            n => Err(format!("step has {n} actions, expected exactly one")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_all_step_kinds() {
        let yaml = r"
steps:
  - request: { method: PUT, url: /order, headers: { X-WireMock-Session-Id: a } }
  - request: { url: /order, use_issued_cookie: true, expect: pending }
  - reset_session: a
  - set_state: { session: a, scenario: OrderFlow, state: Confirmed }
  - clear_session: a
  - reset_all: true
";
        let script: Script = serde_yaml::from_str(yaml).unwrap();
        let labels: Vec<_> = script.steps.iter().map(Step::label).collect();
        assert_eq!(
            labels,
            vec![
                "request",
                "request",
                "reset_session",
                "set_state",
                "clear_session",
                "reset_all"
            ]
        );

        let Step::Request(get) = &script.steps[1] else {
            panic!("expected request step");
        };
        assert_eq!(get.method, "GET");
        assert!(get.use_issued_cookie);
        assert_eq!(get.expect.as_deref(), Some("pending"));
    }

    #[test]
    fn test_reject_empty_step() {
        let yaml = "steps:\n  - {}\n";
        assert!(serde_yaml::from_str::<Script>(yaml).is_err());
    }

    #[test]
    fn test_reject_ambiguous_step() {
        let yaml = "steps:\n  - { reset_all: true, clear_session: a }\n";
        assert!(serde_yaml::from_str::<Script>(yaml).is_err());
    }

    #[test]
    fn test_reject_unknown_field() {
        let yaml = "steps:\n  - request: { url: /a, verb: GET }\n";
        assert!(serde_yaml::from_str::<Script>(yaml).is_err());
    }
}
