//! Registry of state and transition descriptors.
//!
//! Append-only during setup; descriptors registered after the machine starts
//! are legal and simply become visible to future lookups.

use std::sync::Arc;

use crate::core::{State, Transition};
use crate::error::RegistrationError;

/// Owns the state and transition descriptors.
///
/// States are unique by id; transitions are unique by `(from, event)`.
/// Duplicates are rejected at registration rather than silently shadowed.
#[derive(Default)]
pub(crate) struct Registry {
    states: Vec<Arc<State>>,
    transitions: Vec<Arc<Transition>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_state(&mut self, state: State) -> Result<(), RegistrationError> {
        if self.find_state(&state.id).is_some() {
            return Err(RegistrationError::DuplicateState { id: state.id });
        }
        self.states.push(Arc::new(state));
        Ok(())
    }

    pub(crate) fn add_transition(&mut self, transition: Transition) -> Result<(), RegistrationError> {
        if self.find_transition(&transition.from, &transition.event).is_some() {
            return Err(RegistrationError::DuplicateTransition {
                from: transition.from,
                event: transition.event,
            });
        }
        self.transitions.push(Arc::new(transition));
        Ok(())
    }

    pub(crate) fn find_state(&self, id: &str) -> Option<Arc<State>> {
        self.states.iter().find(|s| s.id == id).cloned()
    }

    pub(crate) fn find_transition(&self, from: &str, event: &str) -> Option<Arc<Transition>> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.event == event)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_state_returns_registered_state() {
        let mut registry = Registry::new();
        registry.add_state(State::new("Idle")).unwrap();

        assert_eq!(registry.find_state("Idle").unwrap().id, "Idle");
        assert!(registry.find_state("Missing").is_none());
    }

    #[test]
    fn find_transition_matches_from_and_event() {
        let mut registry = Registry::new();
        registry
            .add_transition(Transition::new("go", "A", "B"))
            .unwrap();
        registry
            .add_transition(Transition::new("go", "B", "C"))
            .unwrap();

        let found = registry.find_transition("B", "go").unwrap();
        assert_eq!(found.to, "C");
        assert!(registry.find_transition("C", "go").is_none());
        assert!(registry.find_transition("A", "stop").is_none());
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let mut registry = Registry::new();
        registry.add_state(State::new("Idle")).unwrap();

        let err = registry.add_state(State::new("Idle")).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateState {
                id: "Idle".to_string()
            }
        );
    }

    #[test]
    fn duplicate_transition_key_is_rejected() {
        let mut registry = Registry::new();
        registry
            .add_transition(Transition::new("go", "A", "B"))
            .unwrap();

        let err = registry
            .add_transition(Transition::new("go", "A", "C"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateTransition {
                from: "A".to_string(),
                event: "go".to_string()
            }
        );
    }

    #[test]
    fn same_event_different_source_is_allowed() {
        let mut registry = Registry::new();
        registry
            .add_transition(Transition::new("go", "A", "B"))
            .unwrap();
        assert!(registry.add_transition(Transition::new("go", "B", "A")).is_ok());
    }
}
