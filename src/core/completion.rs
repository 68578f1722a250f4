//! Single-shot completion tokens for asynchronous state handlers.
//!
//! A state's enter/exit handler signals success or failure exactly once.
//! Rather than handing handlers a bare closure with call-once discipline left
//! to convention, the token consumes itself on resolution, so the type system
//! enforces the contract.

use tokio::sync::oneshot;

/// Receiver half awaited by the transition executor.
pub(crate) type CompletionSignal = oneshot::Receiver<bool>;

/// Move-only token a state handler resolves exactly once.
///
/// The handler may resolve the token synchronously within its own call frame,
/// or move it into a spawned task, timer callback, or any other deferred
/// context owned by the host's executor. Dropping the token unresolved is
/// reported to the executor as failure.
///
/// # Example
///
/// ```rust
/// use waypoint::State;
///
/// // Synchronous success:
/// let idle = State::new("Idle").enter(|_, done| done.succeed());
///
/// // Deferred completion, handed off to the host's scheduler:
/// let working = State::new("Working").enter(|_, done| {
///     tokio::spawn(async move {
///         tokio::time::sleep(std::time::Duration::from_millis(5)).await;
///         done.succeed();
///     });
/// });
/// ```
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<bool>,
}

impl Completion {
    /// Create a token paired with the signal the executor awaits.
    pub(crate) fn channel() -> (Self, CompletionSignal) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Create a token whose outcome nobody observes.
    ///
    /// Used for the initial state's fire-and-forget enter on start.
    pub(crate) fn detached() -> Self {
        let (tx, _rx) = oneshot::channel();
        Self { tx }
    }

    /// Resolve the handler with the given outcome, consuming the token.
    pub fn resolve(self, success: bool) {
        // The executor may have stopped listening (detached start token);
        // a dead receiver is not the handler's problem.
        let _ = self.tx.send(success);
    }

    /// Resolve the handler successfully.
    pub fn succeed(self) {
        self.resolve(true);
    }

    /// Resolve the handler as failed, aborting the in-flight transition.
    pub fn fail(self) {
        self.resolve(false);
    }
}
