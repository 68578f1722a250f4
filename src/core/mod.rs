//! Core state machine types.
//!
//! This module contains the data model the machine operates on:
//! - State descriptors with async enter/exit handlers
//! - Transition descriptors with guards and hooks
//! - The single-shot completion token handlers resolve
//! - The history stack behind `go_back`

mod completion;
mod guard;
mod history;
mod state;
mod transition;

pub use completion::Completion;
pub use guard::Guard;
pub use history::{HistoryStack, TransitionRecord};
pub use state::{State, StateHandler};
pub use transition::{Hook, Transition, TransitionContext, BACK_EVENT, START_EVENT};
