//! External "advance to the next item" request.
//!
//! A process signal handler only stores `true` into the shared flag; the
//! state machine consumes it at the start of each poll.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, clonable advance request.
#[derive(Debug, Clone, Default)]
pub struct AdvanceFlag(Arc<AtomicBool>);

impl AdvanceFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an advance.
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Consume a pending request, if any.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }

    /// The underlying atomic, for registering with a signal handler.
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}
