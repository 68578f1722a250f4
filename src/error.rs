//! Registration errors.

use thiserror::Error;

/// Errors raised when registering states and transitions.
///
/// Runtime conditions (unknown events, guard rejections, busy machines) are
/// deliberately *not* errors; dispatch treats them as silent no-ops. Only
/// configuration mistakes made at registration time surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A state with this id is already registered.
    #[error("duplicate state id '{id}'")]
    DuplicateState { id: String },

    /// A transition with this `(from, event)` key is already registered.
    #[error("duplicate transition for event '{event}' from state '{from}'")]
    DuplicateTransition { from: String, event: String },
}
