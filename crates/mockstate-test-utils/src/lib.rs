//! Testing utilities for mockstate workspace
//!
//! Shared test requests, stub builders and fixtures.

#![allow(missing_docs)]

use mockstate_scenario::{ScenarioConfig, STARTED};
use mockstate_session::{SessionId, SessionSource, DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME};
use mockstate_stub::{
    ExactMatcher, MockstateConfig, RequestLine, RequestPattern, ResponseDefinition, Selection,
    StubMapping, StubSelector,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct TestRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub cookies: HashMap<String, String>,
}

impl TestRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    pub fn put(url: &str) -> Self {
        Self::new("PUT", url)
    }

    pub fn post(url: &str) -> Self {
        Self::new("POST", url)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    /// Session header with the default name
    pub fn in_session(self, session: &str) -> Self {
        self.with_header(DEFAULT_HEADER_NAME, session)
    }

    /// Session cookie with the default name
    pub fn with_session_cookie(self, session: &str) -> Self {
        self.with_cookie(DEFAULT_COOKIE_NAME, session)
    }

    /// Send back the cookie issued by an earlier selection, as a browser would
    pub fn following(self, previous: &Selection) -> Self {
        match &previous.set_cookie {
            Some(cookie) => self.with_cookie(cookie.name(), cookie.value()),
            None => self,
        }
    }
}

impl SessionSource for TestRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

impl RequestLine for TestRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }
}

pub fn stub(method: &str, url: &str, body: &str) -> StubMapping {
    StubMapping::new(RequestPattern::new(method, url), ResponseDefinition::default()).with_body(body)
}

pub fn get(url: &str, body: &str) -> StubMapping {
    stub("GET", url, body)
}

pub fn put(url: &str, body: &str) -> StubMapping {
    stub("PUT", url, body)
}

pub fn post(url: &str, body: &str) -> StubMapping {
    stub("POST", url, body)
}

/// Order flow: GET /order is pending until PUT /order confirms it, with an
/// ungated higher-priority fallback that never wins while a gate matches
pub fn order_flow_stubs() -> Vec<StubMapping> {
    vec![
        get("/order", "fallback").with_priority(1),
        get("/order", "pending")
            .with_priority(10)
            .in_scenario("OrderFlow")
            .when_state_is(STARTED),
        put("/order", "ok")
            .in_scenario("OrderFlow")
            .when_state_is(STARTED)
            .will_set_state_to("Confirmed"),
        get("/order", "confirmed")
            .with_priority(10)
            .in_scenario("OrderFlow")
            .when_state_is("Confirmed"),
    ]
}

/// Counter flow: each POST /count moves Started -> 1 -> 2, GET /count reports
pub fn counter_stubs() -> Vec<StubMapping> {
    vec![
        post("/count", "1")
            .in_scenario("Counter")
            .when_state_is(STARTED)
            .will_set_state_to("1"),
        post("/count", "2")
            .in_scenario("Counter")
            .when_state_is("1")
            .will_set_state_to("2"),
        get("/count", "0").in_scenario("Counter").when_state_is(STARTED),
        get("/count", "1").in_scenario("Counter").when_state_is("1"),
        get("/count", "2").in_scenario("Counter").when_state_is("2"),
    ]
}

pub fn setup_selector(session_aware: bool) -> StubSelector<ExactMatcher> {
    let config = MockstateConfig::new()
        .with_scenarios(ScenarioConfig::new().with_session_aware(session_aware));
    StubSelector::from_config(&config, ExactMatcher)
}

pub fn setup_with_stubs(session_aware: bool, stubs: Vec<StubMapping>) -> StubSelector<ExactMatcher> {
    let selector = setup_selector(session_aware);
    for stub in stubs {
        selector.registry().add(stub).unwrap();
    }
    selector
}

/// Serve `request` and return the winning body, if any
pub fn serve_body(selector: &StubSelector<ExactMatcher>, request: &TestRequest) -> Option<String> {
    selector
        .serve(request)
        .stub
        .and_then(|stub| stub.response.body.clone())
}

pub fn session(value: &str) -> SessionId {
    SessionId::of(value)
}
