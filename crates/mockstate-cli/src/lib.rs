//! mockstate CLI
//!
//! Replays scripted request flows against registered stub mappings
//! in-process, without an HTTP transport.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod replay;
pub mod script;

pub use config::{load_config, load_mappings, load_script, MappingsFile};
pub use error::ConfigError;
pub use replay::{template_scenarios, ReplayReport, Replayer, StepOutcome};
pub use script::{RequestStep, Script, SetState, Step};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
