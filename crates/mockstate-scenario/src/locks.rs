//! Striped per-key locking for scenario updates
//!
//! Serializes read-modify-write sequences on the same [`ScenarioKey`] while
//! leaving unrelated keys concurrent. Disabled locks hand out no guard at
//! all, which gives last-write-wins behaviour.

use crate::store::ScenarioKey;
use parking_lot::{Mutex, MutexGuard};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Fixed array of mutex stripes indexed by key hash
#[derive(Debug)]
pub struct TransitionLocks {
    stripes: Box<[Mutex<()>]>,
}

impl TransitionLocks {
    /// Locks with the given number of stripes (at least one)
    #[must_use]
    pub fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    /// No serialization
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            stripes: Vec::new().into_boxed_slice(),
        }
    }

    /// Whether guards are handed out
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.stripes.is_empty()
    }

    /// Number of stripes
    #[inline]
    #[must_use]
    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    /// Lock the stripe owning `key`
    ///
    /// Guards are not reentrant: never hold one while locking another key.
    #[must_use]
    pub fn lock(&self, key: &ScenarioKey) -> Option<MutexGuard<'_, ()>> {
        if self.stripes.is_empty() {
            return None;
        }
        Some(self.stripes[self.stripe_of(key)].lock())
    }

    fn stripe_of(&self, key: &ScenarioKey) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        // Truncation is fine, only the low bits pick the stripe
        #[allow(clippy::cast_possible_truncation)]
        let hash = hasher.finish() as usize;
        hash % self.stripes.len()
    }
}

impl Default for TransitionLocks {
    fn default() -> Self {
        Self::disabled()
    }
}
