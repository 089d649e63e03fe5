//! Cooperative cancellation for long-running searches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancel flag plus an optional deadline.
///
/// Clones share the flag, so one handle can be given to a search and the
/// other kept by the caller.  Searches poll [`is_cancelled`](Self::is_cancelled)
/// once per priority-queue pop.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag:     Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// A token that only trips if [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip automatically once `timeout` has elapsed from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
