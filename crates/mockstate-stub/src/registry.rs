//! Stub registry
//!
//! Ordered set of registered stubs. Every registration change is mirrored
//! into the scenario lifecycle before the registry itself is mutated, so a
//! rejected lifecycle update leaves both sides untouched.

use crate::error::StubError;
use crate::mapping::StubMapping;
use mockstate_scenario::{Scenarios, StubId};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Registered stubs in registration order
#[derive(Debug)]
pub struct StubRegistry {
    stubs: RwLock<Vec<Arc<StubMapping>>>,
    next_index: AtomicU64,
    scenarios: Arc<dyn Scenarios>,
}

impl StubRegistry {
    /// Create empty registry over a scenario lifecycle
    #[must_use]
    pub fn new(scenarios: Arc<dyn Scenarios>) -> Self {
        Self {
            stubs: RwLock::new(Vec::new()),
            next_index: AtomicU64::new(1),
            scenarios,
        }
    }

    /// Scenario lifecycle this registry feeds
    #[inline]
    #[must_use]
    pub fn scenarios(&self) -> &Arc<dyn Scenarios> {
        &self.scenarios
    }

    /// Register a stub
    ///
    /// # Errors
    ///
    /// Returns [`StubError::DuplicateStub`] if the id is already registered.
    pub fn add(&self, mut stub: StubMapping) -> Result<Arc<StubMapping>, StubError> {
        let mut stubs = self.stubs.write();
        if stubs.iter().any(|s| s.id == stub.id) {
            return Err(StubError::DuplicateStub(stub.id));
        }

        stub.insertion_index = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.scenarios.on_rule_added(&stub);

        let stub = Arc::new(stub);
        stubs.push(Arc::clone(&stub));
        info!("Registered stub {}", stub.id);
        Ok(stub)
    }

    /// Replace the stub with the same id, keeping its registration order
    ///
    /// # Errors
    ///
    /// Returns [`StubError::StubNotFound`] for an unknown id, or
    /// [`StubError::Scenario`] if scenario bookkeeping is inconsistent.
    pub fn edit(&self, mut stub: StubMapping) -> Result<Arc<StubMapping>, StubError> {
        let mut stubs = self.stubs.write();
        let position = Self::position(&stubs, stub.id)?;
        let old = Arc::clone(&stubs[position]);

        stub.insertion_index = old.insertion_index;
        self.scenarios
            .on_rule_updated(&*old, &stub)
            .map_err(|err| {
                error!("Aborting edit of stub {}: {}", stub.id, err);
                err
            })?;

        let stub = Arc::new(stub);
        stubs[position] = Arc::clone(&stub);
        info!("Edited stub {}", stub.id);
        Ok(stub)
    }

    /// Unregister a stub
    ///
    /// # Errors
    ///
    /// Returns [`StubError::StubNotFound`] for an unknown id, or
    /// [`StubError::Scenario`] if scenario bookkeeping is inconsistent.
    pub fn remove(&self, id: StubId) -> Result<Arc<StubMapping>, StubError> {
        let mut stubs = self.stubs.write();
        let position = Self::position(&stubs, id)?;

        self.scenarios
            .on_rule_removed(&*stubs[position])
            .map_err(|err| {
                error!("Aborting removal of stub {}: {}", id, err);
                err
            })?;

        let removed = stubs.remove(position);
        info!("Removed stub {}", id);
        Ok(removed)
    }

    /// Registered stub by id
    #[must_use]
    pub fn get(&self, id: StubId) -> Option<Arc<StubMapping>> {
        self.stubs.read().iter().find(|s| s.id == id).cloned()
    }

    /// Snapshot of every stub in registration order
    #[must_use]
    pub fn all(&self) -> Vec<Arc<StubMapping>> {
        self.stubs.read().clone()
    }

    /// Number of registered stubs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stubs.read().len()
    }

    /// Check if no stubs are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stubs.read().is_empty()
    }

    /// Drop every stub along with all scenario state
    pub fn reset(&self) {
        let mut stubs = self.stubs.write();
        stubs.clear();
        self.scenarios.clear();
        info!("Reset stub registry");
    }

    fn position(stubs: &[Arc<StubMapping>], id: StubId) -> Result<usize, StubError> {
        stubs
            .iter()
            .position(|s| s.id == id)
            .ok_or(StubError::StubNotFound(id))
    }
}
