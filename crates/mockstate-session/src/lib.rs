//! mockstate Session
//!
//! Logical client session identity for session-aware scenarios.
//!
//! # Overview
//!
//! A request carries its session either in an explicit header or in a
//! cookie. When neither is present a fresh token is minted and the caller
//! is expected to hand it back to the client as a `Set-Cookie`.
//!
//! - **SessionId**: opaque session token, or the reserved global namespace
//! - **SessionResolver**: header, then cookie, then mint
//! - **SessionCookie**: the cookie to issue for a freshly minted session
//!
//! # Example
//!
//! ```rust
//! use mockstate_session::{SessionResolver, SessionSource};
//!
//! struct Headerless;
//!
//! impl SessionSource for Headerless {
//!     fn header(&self, _name: &str) -> Option<&str> {
//!         None
//!     }
//!     fn cookie(&self, _name: &str) -> Option<&str> {
//!         None
//!     }
//! }
//!
//! let resolver = SessionResolver::default();
//! let session = resolver.resolve(&Headerless);
//! assert!(session.is_new());
//! assert!(resolver.cookie_for(&session).is_some());
//! ```

#![warn(missing_docs)]

pub mod id;
pub mod resolver;

// Re-exports
pub use id::{SessionId, GLOBAL_SESSION_ID};
pub use resolver::{
    SessionConfig, SessionCookie, SessionResolver, SessionSource, DEFAULT_COOKIE_NAME,
    DEFAULT_HEADER_NAME,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
