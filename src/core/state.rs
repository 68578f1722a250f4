//! State descriptors with asynchronous enter/exit handlers.

use std::fmt;
use std::sync::Arc;

use crate::core::completion::Completion;
use crate::machine::StateMachine;

/// Asynchronous enter/exit handler attached to a state.
///
/// The handler receives a handle to the machine and a [`Completion`] token it
/// must resolve exactly once, either synchronously or after an arbitrary
/// delay. The machine suspends the in-flight transition until the token is
/// resolved.
pub type StateHandler = Arc<dyn Fn(&StateMachine, Completion) + Send + Sync>;

/// A single state, identified by id, with optional async entry/exit handlers.
///
/// # Example
///
/// ```rust
/// use waypoint::State;
///
/// let state = State::new("Working")
///     .enter(|_machine, done| {
///         // kick off work; signal completion when it lands
///         done.succeed();
///     })
///     .exit(|_machine, done| done.succeed());
///
/// assert_eq!(state.id, "Working");
/// assert!(state.on_enter.is_some());
/// assert!(state.on_exit.is_some());
/// ```
#[derive(Clone)]
pub struct State {
    /// Unique state id, the key for registry lookups.
    pub id: String,
    /// Invoked when a transition enters this state.
    pub on_enter: Option<StateHandler>,
    /// Invoked when a transition leaves this state.
    pub on_exit: Option<StateHandler>,
}

impl State {
    /// Create a state with no handlers; entry and exit succeed immediately.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            on_enter: None,
            on_exit: None,
        }
    }

    /// Attach an enter handler.
    pub fn enter<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine, Completion) + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(handler));
        self
    }

    /// Attach an exit handler.
    pub fn exit<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine, Completion) + Send + Sync + 'static,
    {
        self.on_exit = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("id", &self.id)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}
