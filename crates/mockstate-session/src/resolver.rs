//! Session resolution
//!
//! [`SessionResolver`] derives a [`SessionId`] from a request: explicit
//! header first, then cookie, otherwise a freshly minted token. Resolution
//! never touches scenario state.

use crate::id::{SessionId, GLOBAL_SESSION_ID};
use serde::{Deserialize, Serialize};

/// Default request header carrying an explicit session token
pub const DEFAULT_HEADER_NAME: &str = "X-WireMock-Session-Id";

/// Default session cookie name
pub const DEFAULT_COOKIE_NAME: &str = "WireMockSessionId";

/// Read access to the parts of a request that can carry a session
///
/// Implemented by whatever request type the surrounding server uses; header
/// and cookie parsing stay with that server.
pub trait SessionSource {
    /// First value of the named header, if present
    fn header(&self, name: &str) -> Option<&str>;

    /// First value of the named cookie, if present
    fn cookie(&self, name: &str) -> Option<&str>;
}

/// Session resolution configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Header carrying an explicit session token
    pub header_name: String,
    /// Cookie carrying the session token
    pub cookie_name: String,
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With session header name
    #[inline]
    #[must_use]
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// With session cookie name
    #[inline]
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            header_name: DEFAULT_HEADER_NAME.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

/// Cookie to issue for a freshly minted session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    value: String,
}

impl SessionCookie {
    /// Cookie name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session token
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Renders the `Set-Cookie` header value
impl std::fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.name, self.value
        )
    }
}

/// Resolves the session of a request
#[derive(Debug, Clone, Default)]
pub struct SessionResolver {
    config: SessionConfig,
}

impl SessionResolver {
    /// Create resolver with the given names
    #[inline]
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resolve the session for a request
    ///
    /// # Resolution Order
    /// 1. non-empty session header
    /// 2. non-empty session cookie
    /// 3. a newly minted token, flagged new
    ///
    /// A client-supplied value equal to the reserved global id is skipped,
    /// so requests can never address the template namespace.
    pub fn resolve<S: SessionSource + ?Sized>(&self, source: &S) -> SessionId {
        if let Some(value) = accept(source.header(&self.config.header_name), "header") {
            tracing::debug!("Session {} resolved from header", value);
            return SessionId::of(value);
        }

        if let Some(value) = accept(source.cookie(&self.config.cookie_name), "cookie") {
            tracing::debug!("Session {} resolved from cookie", value);
            return SessionId::of(value);
        }

        let minted = SessionId::mint();
        tracing::debug!("Minted new session {}", minted);
        minted
    }

    /// Cookie to set on the response, only for a newly minted session
    #[must_use]
    pub fn cookie_for(&self, session: &SessionId) -> Option<SessionCookie> {
        session.is_new().then(|| SessionCookie {
            name: self.config.cookie_name.clone(),
            value: session.value().to_string(),
        })
    }
}

fn accept<'a>(candidate: Option<&'a str>, origin: &str) -> Option<&'a str> {
    let value = candidate.filter(|v| !v.is_empty())?;
    if value == GLOBAL_SESSION_ID {
        tracing::warn!("Ignoring reserved session id supplied in {}", origin);
        return None;
    }
    Some(value)
}
