//! mockstate Scenario
//!
//! Named, mutable scenario state for an HTTP test double, partitioned per
//! client session.
//!
//! # Overview
//!
//! - **ScenarioStore**: concurrent (session, scenario) -> [`Scenario`] map
//! - **Scenarios**: lifecycle capability with a session-oblivious and a
//!   session-aware variant, selected once via [`build_scenarios`]
//! - **TransitionLocks**: optional striped per-key serialization
//!
//! # Example
//!
//! ```rust
//! use mockstate_scenario::{ScenarioStore, Scenarios, SessionAwareScenarios, StubId, ScenarioRule};
//! use mockstate_session::SessionId;
//! use std::sync::Arc;
//!
//! struct Confirm(StubId);
//!
//! impl ScenarioRule for Confirm {
//!     fn stub_id(&self) -> StubId { self.0 }
//!     fn scenario_name(&self) -> Option<&str> { Some("OrderFlow") }
//!     fn required_state(&self) -> Option<&str> { Some("Started") }
//!     fn new_state(&self) -> Option<&str> { Some("Confirmed") }
//! }
//!
//! let scenarios = SessionAwareScenarios::new(Arc::new(ScenarioStore::new()));
//! let rule = Confirm(StubId::new());
//! scenarios.on_rule_added(&rule);
//!
//! let session = SessionId::of("client-a");
//! scenarios.on_rule_served(&session, &rule);
//! assert_eq!(scenarios.get(&session, "OrderFlow").unwrap().state(), "Confirmed");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod locks;
pub mod scenario;
pub mod store;

// Re-exports
pub use config::{build_scenarios, ScenarioConfig};
pub use error::ScenarioError;
pub use lifecycle::{GlobalScenarios, Scenarios, SessionAwareScenarios};
pub use locks::TransitionLocks;
pub use scenario::{Scenario, ScenarioRule, StubId, STARTED};
pub use store::{Namespace, ScenarioKey, ScenarioStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for scenario operations
    pub use crate::{
        build_scenarios, Scenario, ScenarioConfig, ScenarioError, ScenarioRule, ScenarioStore,
        Scenarios, StubId, STARTED,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
