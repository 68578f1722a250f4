//! Transition history tracking.
//!
//! The history stack is the linear log of committed hops that makes
//! `go_back` possible. It is bootstrapped with a synthetic record when the
//! machine starts and is never empty afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single committed transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state transitioned from (empty for the bootstrap record).
    pub from: String,
    /// The state transitioned to.
    pub to: String,
    /// The event that caused the transition.
    pub event: String,
    /// When the transition committed.
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Create a record stamped with the current time.
    pub fn new(from: impl Into<String>, to: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            event: event.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered log of committed transitions.
///
/// The stack always represents a single linear path from the bootstrap entry
/// to the current state: pushing a record first discards any entries above
/// the one that brought the machine to the record's `from` state, so paths
/// abandoned via `go_back` do not linger.
///
/// # Example
///
/// ```rust
/// use waypoint::{HistoryStack, TransitionRecord};
///
/// let mut history = HistoryStack::new();
/// history.push(TransitionRecord::new("", "A", "__start"));
/// history.push(TransitionRecord::new("A", "B", "go"));
///
/// assert_eq!(history.depth(), 2);
/// assert_eq!(history.path(), vec!["A", "B"]);
/// assert_eq!(history.top().unwrap().from, "A");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryStack {
    records: Vec<TransitionRecord>,
}

impl HistoryStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record, pruning any branch the record diverges from.
    ///
    /// Entries above the record whose `to` matches the new record's `from`
    /// are discarded first; the bootstrap entry is always retained.
    pub fn push(&mut self, record: TransitionRecord) {
        while self.records.len() > 1
            && self.records.last().is_some_and(|top| top.to != record.from)
        {
            self.records.pop();
        }
        self.records.push(record);
    }

    /// Remove and return the top record.
    ///
    /// Refuses to remove the bootstrap entry, so the stack stays non-empty
    /// once the machine has started.
    pub fn pop(&mut self) -> Option<TransitionRecord> {
        if self.records.len() > 1 {
            self.records.pop()
        } else {
            None
        }
    }

    /// The most recently committed record.
    pub fn top(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    /// Number of records on the stack.
    pub fn depth(&self) -> usize {
        self.records.len()
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The states traversed, oldest first (bootstrap's `to` is the initial
    /// state).
    pub fn path(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.to.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bootstrapped(initial: &str) -> HistoryStack {
        let mut history = HistoryStack::new();
        history.push(TransitionRecord::new("", initial, "__start"));
        history
    }

    #[test]
    fn new_stack_is_empty() {
        let history = HistoryStack::new();
        assert_eq!(history.depth(), 0);
        assert!(history.top().is_none());
        assert!(history.path().is_empty());
    }

    #[test]
    fn push_appends_in_order() {
        let mut history = bootstrapped("A");
        history.push(TransitionRecord::new("A", "B", "go"));
        history.push(TransitionRecord::new("B", "C", "next"));

        assert_eq!(history.depth(), 3);
        assert_eq!(history.path(), vec!["A", "B", "C"]);
        assert_eq!(history.top().unwrap().event, "next");
    }

    #[test]
    fn pop_never_removes_bootstrap() {
        let mut history = bootstrapped("A");
        history.push(TransitionRecord::new("A", "B", "go"));

        assert!(history.pop().is_some());
        assert!(history.pop().is_none());
        assert_eq!(history.depth(), 1);
        assert_eq!(history.top().unwrap().to, "A");
    }

    #[test]
    fn push_prunes_diverged_branch() {
        let mut history = bootstrapped("A");
        history.push(TransitionRecord::new("A", "B", "go"));
        history.push(TransitionRecord::new("B", "C", "next"));

        // A new hop out of A abandons the B/C branch entirely.
        history.push(TransitionRecord::new("A", "D", "jump"));

        assert_eq!(history.path(), vec!["A", "D"]);
    }

    #[test]
    fn push_without_matching_prefix_keeps_bootstrap() {
        let mut history = bootstrapped("A");
        history.push(TransitionRecord::new("X", "Y", "warp"));

        assert_eq!(history.depth(), 2);
        assert_eq!(history.records()[0].to, "A");
    }

    #[test]
    fn self_loop_records_are_kept() {
        let mut history = bootstrapped("A");
        history.push(TransitionRecord::new("A", "A", "tick"));
        assert_eq!(history.depth(), 2);
        assert_eq!(history.path(), vec!["A", "A"]);
    }

    #[test]
    fn records_serialize_round_trip() {
        let mut history = bootstrapped("A");
        history.push(TransitionRecord::new("A", "B", "go"));

        let json = serde_json::to_string(&history).unwrap();
        let restored: HistoryStack = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.depth(), history.depth());
        assert_eq!(restored.path(), history.path());
        assert_eq!(restored.top().unwrap().event, "go");
    }
}
