//! The state machine: event dispatch and the transition executor.
//!
//! [`StateMachine`] is a cheap-to-clone handle; handlers, guards, and
//! observers receive clones of it and may query the machine freely. At most
//! one transition pipeline is in flight per machine at any time, enforced
//! solely by the `transitioning` flag: events arriving while busy (including
//! events raised from inside a handler of the in-flight transition) are
//! dropped, never queued.

mod registry;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, warn};

use crate::core::{
    Completion, HistoryStack, Hook, State, Transition, TransitionContext, TransitionRecord,
    BACK_EVENT, START_EVENT,
};
use crate::error::RegistrationError;
use registry::Registry;

/// How the executor updates history on a successful commit.
enum HistoryOp {
    /// Append a new record (forward transition).
    Push,
    /// Pop the top record (back transition).
    Pop,
}

/// Mutable machine state, owned exclusively by the machine and mutated only
/// between suspension points.
#[derive(Default)]
struct Core {
    current: String,
    initial: String,
    transitioning: bool,
    history: HistoryStack,
}

struct Inner {
    registry: Mutex<Registry>,
    core: Mutex<Core>,
    started: Mutex<Vec<Hook>>,
    finished: Mutex<Vec<Hook>>,
}

/// An asynchronous, event-driven finite state machine with navigable history.
///
/// States and transitions are registered up front (registration after
/// [`start`](StateMachine::start) is legal and affects future lookups only),
/// then events drive the machine through an exit → enter → after pipeline in
/// which each phase may complete asynchronously.
///
/// # Example
///
/// ```rust
/// use waypoint::{State, StateMachine, Transition};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let sm = StateMachine::new();
/// sm.add_state(State::new("Idle")).unwrap();
/// sm.add_state(State::new("Working").enter(|_, done| done.succeed())).unwrap();
/// sm.add_transition(Transition::new("start", "Idle", "Working")).unwrap();
/// sm.set_initial("Idle");
/// sm.start();
///
/// sm.trigger_event("start").await;
/// assert_eq!(sm.current(), "Working");
/// assert!(sm.can_go_back());
///
/// sm.go_back().await;
/// assert_eq!(sm.current(), "Idle");
/// # }
/// ```
#[derive(Clone)]
pub struct StateMachine {
    inner: Arc<Inner>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create an empty machine.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry::new()),
                core: Mutex::new(Core::default()),
                started: Mutex::new(Vec::new()),
                finished: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Set the initial state by id. Must be called before [`start`](Self::start).
    pub fn set_initial(&self, id: impl Into<String>) {
        self.core().initial = id.into();
    }

    /// Register a state. Duplicate ids are rejected.
    pub fn add_state(&self, state: State) -> Result<(), RegistrationError> {
        self.registry().add_state(state)
    }

    /// Register a transition. Duplicate `(from, event)` keys are rejected.
    pub fn add_transition(&self, transition: Transition) -> Result<(), RegistrationError> {
        self.registry().add_transition(transition)
    }

    /// Start the machine in the initial state.
    ///
    /// Pushes the bootstrap history record and fires the initial state's
    /// enter handler fire-and-forget: its outcome is not observed and does
    /// not set the transitioning flag.
    ///
    /// # Panics
    ///
    /// Panics if no initial state was set or the initial id is not
    /// registered. Both are programming errors, not runtime conditions.
    pub fn start(&self) {
        let initial = self.core().initial.clone();
        assert!(
            !initial.is_empty(),
            "start() requires an initial state; call set_initial() first"
        );
        let state = self
            .registry()
            .find_state(&initial)
            .unwrap_or_else(|| panic!("initial state '{initial}' is not registered"));

        {
            let mut core = self.core();
            core.current = initial.clone();
            core.history
                .push(TransitionRecord::new("", initial, START_EVENT));
        }

        if let Some(handler) = &state.on_enter {
            handler(self, Completion::detached());
        }
    }

    /// Trigger a named event, running the matching transition if one exists.
    ///
    /// A no-op when a transition is already in flight, when no
    /// `(current, event)` transition is registered, or when the transition's
    /// guard rejects. The guard is evaluated before `on_before`, so a
    /// rejected transition fires no hooks.
    pub async fn trigger_event(&self, event: &str) {
        if self.is_transitioning() {
            debug!(event, "event dropped, transition in flight");
            return;
        }
        let current = self.current();
        let Some(transition) = self.registry().find_transition(&current, event) else {
            debug!(event, state = %current, "no transition registered for event");
            return;
        };

        let ctx = self.context_for(&transition);
        if let Some(guard) = &transition.guard {
            if !guard.check(&ctx) {
                debug!(event, from = %transition.from, to = %transition.to, "guard rejected transition");
                return;
            }
        }

        self.run_transition(&transition, HistoryOp::Push).await;
    }

    /// Attempt the given transition directly, without a registry lookup.
    ///
    /// Same busy and guard semantics as [`trigger_event`](Self::trigger_event).
    /// Returns `true` iff the executor was invoked, regardless of whether the
    /// transition ultimately committed.
    pub async fn try_transition(&self, transition: Transition) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let ctx = self.context_for(&transition);
        if let Some(guard) = &transition.guard {
            if !guard.check(&ctx) {
                return false;
            }
        }
        self.run_transition(&transition, HistoryOp::Push).await;
        true
    }

    /// Revert to the previous state, if history allows.
    ///
    /// A no-op when busy or when [`can_go_back`](Self::can_go_back) is false.
    /// The synthesized back transition is tagged [`BACK_EVENT`] and bypasses
    /// guards and per-transition hooks; on success the top history record is
    /// popped instead of a new one being pushed. The machine-wide
    /// notifications still fire.
    pub async fn go_back(&self) {
        let back = {
            let core = self.core();
            if core.transitioning || core.history.depth() <= 1 {
                return;
            }
            let top = core.history.top().expect("non-empty history post-start");
            Transition::new(BACK_EVENT, core.current.clone(), top.from.clone())
        };
        self.run_transition(&back, HistoryOp::Pop).await;
    }

    /// The current state id. Empty before [`start`](Self::start).
    pub fn current(&self) -> String {
        self.core().current.clone()
    }

    /// True while a transition pipeline is in flight.
    pub fn is_transitioning(&self) -> bool {
        self.core().transitioning
    }

    /// True when there is a committed transition to undo.
    pub fn can_go_back(&self) -> bool {
        self.core().history.depth() > 1
    }

    /// Snapshot of the committed transition history, oldest first.
    pub fn history(&self) -> Vec<TransitionRecord> {
        self.core().history.records().to_vec()
    }

    /// Log the transition history at debug level.
    pub fn dump_history(&self) {
        let records = self.history();
        debug!(depth = records.len(), "state machine history");
        for (index, record) in records.iter().enumerate() {
            debug!(
                index,
                from = %record.from,
                to = %record.to,
                event = %record.event,
                "history entry"
            );
        }
    }

    /// Register an observer fired just before any transition pipeline begins.
    pub fn on_transition_started<F>(&self, observer: F)
    where
        F: Fn(&TransitionContext) + Send + Sync + 'static,
    {
        self.observers(&self.inner.started).push(Arc::new(observer));
    }

    /// Register an observer fired just after any transition commits.
    pub fn on_transition_finished<F>(&self, observer: F)
    where
        F: Fn(&TransitionContext) + Send + Sync + 'static,
    {
        self.observers(&self.inner.finished).push(Arc::new(observer));
    }

    /// The transition executor: exit → enter → commit, with asynchronous
    /// completion at the exit and enter phases.
    ///
    /// Returns `true` iff the transition committed. No lock is held across a
    /// suspension point.
    async fn run_transition(&self, transition: &Transition, op: HistoryOp) -> bool {
        // Referencing an unregistered state is a configuration error; abort
        // before the pipeline starts.
        let (from_state, to_state) = {
            let registry = self.registry();
            (
                registry.find_state(&transition.from),
                registry.find_state(&transition.to),
            )
        };
        let (Some(from_state), Some(to_state)) = (from_state, to_state) else {
            error!(
                from = %transition.from,
                to = %transition.to,
                event = %transition.event,
                "transition references an unregistered state"
            );
            return false;
        };

        // Single-flight lock: check-and-set must be atomic.
        {
            let mut core = self.core();
            if core.transitioning {
                return false;
            }
            core.transitioning = true;
        }

        let ctx = self.context_for(transition);

        self.notify(&self.inner.started, &ctx);
        if let Some(before) = &transition.on_before {
            before(&ctx);
        }

        if !self.run_handler(from_state.on_exit.clone()).await {
            warn!(state = %transition.from, event = %transition.event, "exit handler failed, transition aborted");
            self.core().transitioning = false;
            return false;
        }

        // Canonical failure policy: the machine only leaves the source state
        // once the destination's enter handler succeeds, so enter failure
        // mirrors exit failure.
        if !self.run_handler(to_state.on_enter.clone()).await {
            warn!(state = %transition.to, event = %transition.event, "enter handler failed, transition aborted");
            self.core().transitioning = false;
            return false;
        }

        {
            let mut core = self.core();
            core.current = transition.to.clone();
            match op {
                HistoryOp::Push => core.history.push(TransitionRecord::new(
                    transition.from.clone(),
                    transition.to.clone(),
                    transition.event.clone(),
                )),
                HistoryOp::Pop => {
                    core.history.pop();
                }
            }
        }

        self.notify(&self.inner.finished, &ctx);
        if let Some(after) = &transition.on_after {
            after(&ctx);
        }

        // Cleared last so triggers raised from the finish hooks are dropped
        // like any other reentrant event.
        self.core().transitioning = false;
        true
    }

    /// Invoke a state handler and await its completion signal.
    ///
    /// An absent handler is immediate success; a token dropped unresolved is
    /// failure.
    async fn run_handler(&self, handler: Option<crate::core::StateHandler>) -> bool {
        match handler {
            None => true,
            Some(handler) => {
                let (done, signal) = Completion::channel();
                handler(self, done);
                signal.await.unwrap_or(false)
            }
        }
    }

    fn context_for(&self, transition: &Transition) -> TransitionContext {
        TransitionContext {
            machine: self.clone(),
            from: transition.from.clone(),
            to: transition.to.clone(),
            event: transition.event.clone(),
        }
    }

    fn notify(&self, observers: &Mutex<Vec<Hook>>, ctx: &TransitionContext) {
        let observers = self.observers(observers).clone();
        for observer in observers {
            observer(ctx);
        }
    }

    fn core(&self) -> MutexGuard<'_, Core> {
        self.inner.core.lock().expect("state machine lock poisoned")
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner
            .registry
            .lock()
            .expect("state machine lock poisoned")
    }

    fn observers<'a>(&self, list: &'a Mutex<Vec<Hook>>) -> MutexGuard<'a, Vec<Hook>> {
        list.lock().expect("state machine lock poisoned")
    }
}
