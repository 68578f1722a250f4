//! Waypoint: an embeddable asynchronous, event-driven state machine.
//!
//! Waypoint orchestrates control flow where entering or leaving a state may
//! take an arbitrary, externally-scheduled amount of time. For every named
//! event the machine decides whether a transition is currently legal, runs it
//! through an ordered pipeline of hooks and asynchronous exit/enter handlers,
//! and maintains a navigable history enabling undo via
//! [`go_back`](machine::StateMachine::go_back).
//!
//! # Core Concepts
//!
//! - **State**: a named state with optional async enter/exit handlers that
//!   resolve a single-shot [`Completion`] token
//! - **Transition**: an `(event, from, to)` descriptor with an optional
//!   [`Guard`] and before/after hooks
//! - **History**: the linear log of committed hops behind `go_back`
//! - **Single flight**: at most one transition pipeline is in flight per
//!   machine; events arriving while busy are dropped, never queued
//!
//! The engine creates no tasks, timers, or threads of its own; handlers hand
//! their completion token to whatever scheduler the host runs.
//!
//! # Example
//!
//! ```rust
//! use waypoint::{State, StateMachine, Transition};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sm = StateMachine::new();
//! sm.add_state(State::new("Idle")).unwrap();
//! sm.add_state(State::new("Working").enter(|_machine, done| {
//!     // complete now, or move `done` into a timer or spawned task
//!     done.succeed();
//! })).unwrap();
//! sm.add_transition(Transition::new("start", "Idle", "Working")).unwrap();
//!
//! sm.set_initial("Idle");
//! sm.start();
//!
//! sm.trigger_event("start").await;
//! assert_eq!(sm.current(), "Working");
//!
//! sm.go_back().await;
//! assert_eq!(sm.current(), "Idle");
//! # }
//! ```

pub mod core;
pub mod error;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{
    Completion, Guard, HistoryStack, Hook, State, StateHandler, Transition, TransitionContext,
    TransitionRecord, BACK_EVENT, START_EVENT,
};
pub use crate::error::RegistrationError;
pub use crate::machine::StateMachine;
