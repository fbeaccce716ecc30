//! mockstate Stub
//!
//! Stub registration and scenario-aware stub selection.
//!
//! # Overview
//!
//! - **StubMapping**: request pattern, response and optional scenario gating
//! - **StubRegistry**: ordered registrations, mirrored into the scenario
//!   lifecycle
//! - **StubSelector**: resolves the session, filters candidates through a
//!   [`RequestMatcher`], picks a winner and applies its transition
//!
//! # Example
//!
//! ```rust
//! use mockstate_stub::{
//!     ExactMatcher, MockstateConfig, RequestLine, RequestPattern, ResponseDefinition,
//!     StubMapping, StubSelector,
//! };
//! use mockstate_session::SessionSource;
//!
//! struct Get(&'static str);
//!
//! impl RequestLine for Get {
//!     fn method(&self) -> &str { "GET" }
//!     fn url(&self) -> &str { self.0 }
//! }
//!
//! impl SessionSource for Get {
//!     fn header(&self, name: &str) -> Option<&str> {
//!         (name == "X-WireMock-Session-Id").then_some("doc")
//!     }
//!     fn cookie(&self, _name: &str) -> Option<&str> { None }
//! }
//!
//! let selector = StubSelector::from_config(&MockstateConfig::default(), ExactMatcher);
//! let stub = StubMapping::new(RequestPattern::new("GET", "/ping"), ResponseDefinition::default())
//!     .with_body("pong");
//! selector.registry().add(stub).unwrap();
//!
//! let selection = selector.serve(&Get("/ping"));
//! assert_eq!(selection.stub.unwrap().response.body.as_deref(), Some("pong"));
//! assert_eq!(selection.session.value(), "doc");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod mapping;
pub mod matcher;
pub mod registry;
pub mod selector;

// Re-exports
pub use config::MockstateConfig;
pub use error::StubError;
pub use mapping::{RequestPattern, ResponseDefinition, StubMapping};
pub use matcher::{ExactMatcher, RequestLine, RequestMatcher, ANY_METHOD};
pub use registry::StubRegistry;
pub use selector::{select_winner, Selection, StubSelector};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
