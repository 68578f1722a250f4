//! Transition descriptors, hooks, and the context passed to callbacks.

use std::fmt;
use std::sync::Arc;

use crate::core::guard::Guard;
use crate::machine::StateMachine;

/// Reserved event recorded for the bootstrap history entry pushed by
/// [`StateMachine::start`].
pub const START_EVENT: &str = "__start";

/// Reserved event tagged onto transitions synthesized by
/// [`StateMachine::go_back`].
pub const BACK_EVENT: &str = "__back";

/// Side-effecting callback attached to a transition (`on_before`/`on_after`)
/// or registered as a machine-wide notification. Hooks have no bearing on
/// whether the transition proceeds.
pub type Hook = Arc<dyn Fn(&TransitionContext) + Send + Sync>;

/// Ephemeral value passed to guards, hooks, and notification observers.
#[derive(Clone)]
pub struct TransitionContext {
    /// Handle to the machine running the transition.
    pub machine: StateMachine,
    /// Source state id.
    pub from: String,
    /// Destination state id.
    pub to: String,
    /// Event that triggered the transition.
    pub event: String,
}

impl fmt::Debug for TransitionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionContext")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("event", &self.event)
            .finish()
    }
}

/// A transition between two states, keyed by `(from, event)`, with an
/// optional guard and before/after hooks.
///
/// The guard is evaluated before `on_before`; a rejected transition fires no
/// hooks at all.
///
/// # Example
///
/// ```rust
/// use waypoint::Transition;
///
/// let transition = Transition::new("start", "Idle", "Working")
///     .when(|_ctx| true)
///     .before(|ctx| println!("leaving {}", ctx.from))
///     .after(|ctx| println!("now in {}", ctx.to));
///
/// assert_eq!(transition.event, "start");
/// assert!(transition.guard.is_some());
/// ```
#[derive(Clone)]
pub struct Transition {
    /// Event name that triggers this transition.
    pub event: String,
    /// Source state id.
    pub from: String,
    /// Destination state id.
    pub to: String,
    /// Optional predicate deciding whether the transition may proceed.
    pub guard: Option<Guard>,
    /// Fired after the guard accepts, before the exit handler runs.
    pub on_before: Option<Hook>,
    /// Fired after a successful commit.
    pub on_after: Option<Hook>,
}

impl Transition {
    /// Create a bare transition with no guard or hooks.
    pub fn new(event: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            from: from.into(),
            to: to.into(),
            guard: None,
            on_before: None,
            on_after: None,
        }
    }

    /// Attach a guard predicate.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TransitionContext) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Attach a hook fired before the exit handler runs.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext) + Send + Sync + 'static,
    {
        self.on_before = Some(Arc::new(hook));
        self
    }

    /// Attach a hook fired after a successful commit.
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext) + Send + Sync + 'static,
    {
        self.on_after = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("event", &self.event)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("guard", &self.guard.is_some())
            .field("on_before", &self.on_before.is_some())
            .field("on_after", &self.on_after.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transition_has_no_guard_or_hooks() {
        let transition = Transition::new("go", "A", "B");
        assert_eq!(transition.event, "go");
        assert_eq!(transition.from, "A");
        assert_eq!(transition.to, "B");
        assert!(transition.guard.is_none());
        assert!(transition.on_before.is_none());
        assert!(transition.on_after.is_none());
    }

    #[test]
    fn fluent_attachment_sets_guard_and_hooks() {
        let transition = Transition::new("go", "A", "B")
            .when(|_| true)
            .before(|_| {})
            .after(|_| {});

        assert!(transition.guard.is_some());
        assert!(transition.on_before.is_some());
        assert!(transition.on_after.is_some());
    }

    #[test]
    fn reserved_event_names_are_distinct() {
        assert_ne!(START_EVENT, BACK_EVENT);
        assert!(START_EVENT.starts_with("__"));
        assert!(BACK_EVENT.starts_with("__"));
    }

    #[test]
    fn debug_elides_callbacks() {
        let transition = Transition::new("go", "A", "B").when(|_| true);
        let rendered = format!("{transition:?}");
        assert!(rendered.contains("guard: true"));
        assert!(rendered.contains("on_after: false"));
    }
}
