//! Error types for scenario lifecycle operations
//!
//! Absence of a scenario is never an error on the request path; these
//! variants only surface from admin operations.

/// Scenario lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    /// A rule update or removal referenced a template that does not exist.
    ///
    /// Indicates broken add/update bookkeeping; the admin operation must be
    /// aborted.
    #[error("internal consistency fault: no template scenario '{scenario}'")]
    MissingTemplate {
        /// Scenario the rule claimed to belong to
        scenario: String,
    },

    /// Targeted admin mutation of a scenario nobody registered
    #[error("scenario not found: {scenario}")]
    ScenarioNotFound {
        /// Requested scenario name
        scenario: String,
    },
}

impl ScenarioError {
    /// Check if error is an internal consistency fault
    #[inline]
    #[must_use]
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, Self::MissingTemplate { .. })
    }
}
