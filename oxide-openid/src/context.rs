//! Cancellation, deadlines and trace metadata of a single call.
//!
//! A `Context` is handed through the handler chain next to the request and the response. It is
//! limited to cross-cutting concerns: it can tell collaborators that the caller gave
//! up or ran out of time, and it carries an identifier for correlating log records. It never
//! carries request or response state.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation signal, deadline and trace identifier of one call.
///
/// Clones share the cancellation flag, so a caller can keep one copy and cancel the call while
/// another copy is passed down the chain.
#[derive(Clone, Debug, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
    trace_id: Option<String>,
}

/// The reason a context is no longer live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The call was cancelled by the caller.
    #[error("the call was cancelled")]
    Cancelled,

    /// The deadline of the call has passed.
    #[error("the deadline of the call has passed")]
    DeadlineExceeded,
}

impl Context {
    /// A context without deadline, trace id or cancellation.
    pub fn background() -> Self {
        Context::default()
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach an identifier correlating this call in logs and traces.
    pub fn with_trace_id<T: Into<String>>(mut self, trace_id: T) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The trace identifier, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Signal all holders of this context that the call is no longer needed.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if the call should still proceed.
    ///
    /// Slow collaborators call this before doing work on behalf of the call.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Err(ContextError::Cancelled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
