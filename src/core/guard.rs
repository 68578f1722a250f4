//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions evaluated synchronously by the dispatcher
//! before a matched transition is handed to the executor. A rejecting guard
//! stops the transition before any hook fires.

use std::fmt;
use std::sync::Arc;

use crate::core::transition::TransitionContext;

/// Predicate that decides whether a matched transition may proceed.
///
/// # Example
///
/// ```rust
/// use waypoint::{Guard, StateMachine, TransitionContext};
///
/// let only_to_working = Guard::new(|ctx: &TransitionContext| ctx.to == "Working");
///
/// let ctx = TransitionContext {
///     machine: StateMachine::new(),
///     from: "Idle".to_string(),
///     to: "Working".to_string(),
///     event: "start".to_string(),
/// };
/// assert!(only_to_working.check(&ctx));
/// ```
pub struct Guard {
    predicate: Arc<dyn Fn(&TransitionContext) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a predicate.
    ///
    /// The predicate may inspect the machine through the context (for example
    /// `ctx.machine.current()`), but it runs while no transition is in flight
    /// and must not attempt to start one.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TransitionContext) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard for this transition.
    pub fn check(&self, ctx: &TransitionContext) -> bool {
        (self.predicate)(ctx)
    }
}

impl Clone for Guard {
    fn clone(&self) -> Self {
        Guard {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::StateMachine;

    fn ctx(from: &str, to: &str, event: &str) -> TransitionContext {
        TransitionContext {
            machine: StateMachine::new(),
            from: from.to_string(),
            to: to.to_string(),
            event: event.to_string(),
        }
    }

    #[test]
    fn guard_evaluates_predicate() {
        let guard = Guard::new(|ctx: &TransitionContext| ctx.event == "start");
        assert!(guard.check(&ctx("Idle", "Working", "start")));
        assert!(!guard.check(&ctx("Idle", "Working", "stop")));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new(|ctx: &TransitionContext| ctx.from == "Idle");
        let context = ctx("Idle", "Working", "start");
        assert_eq!(guard.check(&context), guard.check(&context));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::new(|_: &TransitionContext| true);
        let cloned = guard.clone();
        assert!(cloned.check(&ctx("A", "B", "go")));
    }
}
