//! In-process replay of scripted flows
//!
//! Registers mappings, then runs every script step against one selector,
//! recording what each request was served.

use crate::script::{RequestStep, Script, SetState, Step};
use mockstate_scenario::Scenario;
use mockstate_session::{SessionCookie, SessionId, SessionSource};
use mockstate_stub::{ExactMatcher, MockstateConfig, RequestLine, StubError, StubMapping, StubSelector};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Request assembled from a script step
#[derive(Debug, Clone, Default)]
pub struct ScriptRequest {
    method: String,
    url: String,
    headers: BTreeMap<String, String>,
    cookies: BTreeMap<String, String>,
}

impl ScriptRequest {
    fn from_step(step: &RequestStep, issued: Option<&SessionCookie>) -> Self {
        let headers = step
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect();
        let mut cookies = step.cookies.clone();
        if step.use_issued_cookie {
            if let Some(cookie) = issued {
                cookies.insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }
        Self {
            method: step.method.clone(),
            url: step.url.clone(),
            headers,
            cookies,
        }
    }
}

impl SessionSource for ScriptRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

impl RequestLine for ScriptRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// 1-based step number
    pub step: usize,
    /// Step kind
    pub kind: &'static str,
    /// Human-readable step target
    pub target: String,
    /// Session the request resolved to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    /// Served status; 404 when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Served body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Issued `Set-Cookie` header value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_cookie: Option<String>,
    /// Why the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl StepOutcome {
    fn new(step: usize, kind: &'static str, target: String) -> Self {
        Self {
            step,
            kind,
            target,
            session: None,
            status: None,
            body: None,
            set_cookie: None,
            failure: None,
        }
    }

    /// Check if the step met its expectations
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.step, self.target)?;
        if let Some(session) = &self.session {
            write!(f, " session={session}")?;
        }
        match (self.status, &self.body) {
            (Some(404), None) => write!(f, " -> 404 no match")?,
            (Some(status), Some(body)) => write!(f, " -> {status} {body}")?,
            (Some(status), None) => write!(f, " -> {status}")?,
            (None, _) => write!(f, " -> ok")?,
        }
        if let Some(cookie) = &self.set_cookie {
            write!(f, " (Set-Cookie: {cookie})")?;
        }
        if let Some(failure) = &self.failure {
            write!(f, " FAIL: {failure}")?;
        }
        Ok(())
    }
}

/// Outcome of a whole replay
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Per-step outcomes in execution order
    pub outcomes: Vec<StepOutcome>,
}

impl ReplayReport {
    /// Steps that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&StepOutcome> {
        self.outcomes.iter().filter(|o| !o.passed()).collect()
    }

    /// Check if every step passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(StepOutcome::passed)
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} steps, {} failed",
            self.outcomes.len(),
            self.failures().len()
        )
    }
}

/// Drives script steps against a selector
#[derive(Debug)]
pub struct Replayer {
    selector: StubSelector<ExactMatcher>,
    issued: Option<SessionCookie>,
}

impl Replayer {
    /// Create replayer with `mappings` registered in order
    ///
    /// # Errors
    ///
    /// Returns [`StubError`] if a mapping id is registered twice.
    pub fn new(config: &MockstateConfig, mappings: Vec<StubMapping>) -> Result<Self, StubError> {
        let selector = StubSelector::from_config(config, ExactMatcher);
        for mapping in mappings {
            selector.registry().add(mapping)?;
        }
        Ok(Self {
            selector,
            issued: None,
        })
    }

    /// Underlying selector
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &StubSelector<ExactMatcher> {
        &self.selector
    }

    /// Run every step of `script`
    pub fn run(&mut self, script: &Script) -> ReplayReport {
        let outcomes = script
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| self.run_step(i + 1, step))
            .collect();
        ReplayReport { outcomes }
    }

    /// Run one step
    pub fn run_step(&mut self, number: usize, step: &Step) -> StepOutcome {
        let scenarios = self.selector.scenarios();
        match step {
            Step::Request(request) => self.request(number, request),
            Step::ResetAll => {
                scenarios.reset();
                StepOutcome::new(number, step.label(), "reset all".to_string())
            }
            Step::ResetSession(session) => {
                scenarios.reset_session(&SessionId::of(session.as_str()));
                StepOutcome::new(number, step.label(), format!("reset session {session}"))
            }
            Step::ClearSession(session) => {
                scenarios.clear_session(&SessionId::of(session.as_str()));
                StepOutcome::new(number, step.label(), format!("clear session {session}"))
            }
            Step::SetState(SetState {
                session,
                scenario,
                state,
            }) => {
                let mut outcome = StepOutcome::new(
                    number,
                    step.label(),
                    format!("set {scenario} to {state} for session {session}"),
                );
                if let Err(err) =
                    scenarios.set_single(&SessionId::of(session.as_str()), scenario, state)
                {
                    tracing::warn!("Step {} failed: {}", number, err);
                    outcome.failure = Some(err.to_string());
                }
                outcome
            }
        }
    }

    fn request(&mut self, number: usize, step: &RequestStep) -> StepOutcome {
        let request = ScriptRequest::from_step(step, self.issued.as_ref());
        let selection = self.selector.serve(&request);

        let mut outcome = StepOutcome::new(
            number,
            "request",
            format!("{} {}", step.method, step.url),
        );
        outcome.session = Some(selection.session.value().to_string());
        match &selection.stub {
            Some(stub) => {
                outcome.status = Some(stub.response.status);
                outcome.body.clone_from(&stub.response.body);
            }
            None => outcome.status = Some(404),
        }
        if let Some(cookie) = selection.set_cookie {
            outcome.set_cookie = Some(cookie.to_string());
            self.issued = Some(cookie);
        }

        let mut failures = Vec::new();
        if let Some(expected) = &step.expect {
            if outcome.body.as_ref() != Some(expected) {
                failures.push(format!(
                    "expected body '{}', got '{}'",
                    expected,
                    outcome.body.as_deref().unwrap_or_default()
                ));
            }
        }
        if let Some(expected) = step.expect_status {
            if outcome.status != Some(expected) {
                failures.push(format!(
                    "expected status {}, got {}",
                    expected,
                    outcome.status.unwrap_or_default()
                ));
            }
        }
        if !failures.is_empty() {
            tracing::warn!("Step {} failed: {}", number, failures.join("; "));
            outcome.failure = Some(failures.join("; "));
        }
        outcome
    }
}

/// Template scenarios derived from `mappings`
///
/// # Errors
///
/// Returns [`StubError`] if a mapping id is registered twice.
pub fn template_scenarios(mappings: Vec<StubMapping>) -> Result<Vec<Scenario>, StubError> {
    let replayer = Replayer::new(&MockstateConfig::default(), mappings)?;
    Ok(replayer
        .selector()
        .scenarios()
        .all_for_session(&SessionId::global()))
}
