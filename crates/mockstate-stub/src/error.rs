//! Error types for stub registration

use mockstate_scenario::{ScenarioError, StubId};

/// Stub registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StubError {
    /// A stub with this id is already registered
    #[error("stub already registered: {0}")]
    DuplicateStub(StubId),

    /// No stub with this id is registered
    #[error("stub not found: {0}")]
    StubNotFound(StubId),

    /// Scenario bookkeeping rejected the operation
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),
}

impl StubError {
    /// Check if error signals broken scenario bookkeeping
    #[inline]
    #[must_use]
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, Self::Scenario(err) if err.is_internal_fault())
    }
}
