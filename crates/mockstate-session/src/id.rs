//! Session identifiers
//!
//! Provides [`SessionId`], the key component that partitions scenario state
//! between clients.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Reserved value of the global (template) namespace.
///
/// Minted tokens are UUIDs, so they can never take this value.
pub const GLOBAL_SESSION_ID: &str = "__global__";

/// Logical client session identity
///
/// Two ids are equal iff their values are equal; the `is_new` flag only
/// records whether the id was minted while resolving the current request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionId {
    value: String,
    #[serde(skip)]
    is_new: bool,
}

impl SessionId {
    /// The global namespace holding scenario templates
    #[inline]
    #[must_use]
    pub fn global() -> Self {
        Self {
            value: GLOBAL_SESSION_ID.to_string(),
            is_new: false,
        }
    }

    /// Existing session with the given token
    #[inline]
    #[must_use]
    pub fn of(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_new: false,
        }
    }

    /// Mint a fresh random session token
    #[must_use]
    pub fn mint() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            is_new: true,
        }
    }

    /// Token value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether this id was minted for the current request
    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Whether this is the global template namespace
    #[inline]
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.value == GLOBAL_SESSION_ID
    }
}

impl PartialEq for SessionId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SessionId {}

impl Hash for SessionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn global_is_global() {
        let global = SessionId::global();
        assert!(global.is_global());
        assert!(!global.is_new());
        assert_eq!(global.value(), GLOBAL_SESSION_ID);
    }

    #[test]
    fn minted_ids_are_new_uuids() {
        let minted = SessionId::mint();
        assert!(minted.is_new());
        assert!(!minted.is_global());
        assert!(Uuid::parse_str(minted.value()).is_ok());
    }

    #[test]
    fn minted_ids_do_not_repeat() {
        let ids: HashSet<_> = (0..256).map(|_| SessionId::mint()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn equality_ignores_new_flag() {
        let minted = SessionId::mint();
        let existing = SessionId::of(minted.value());
        assert_eq!(minted, existing);

        let mut set = HashSet::new();
        set.insert(minted);
        assert!(set.contains(&existing));
    }

    #[test]
    fn display_is_the_value() {
        assert_eq!(SessionId::of("abc").to_string(), "abc");
    }
}
