//! Caller-driven cancellation and deadlines.
//!
//! A `Context` travels with every accessor call. Clones share one cancel
//! flag, so a request running on one thread can be abandoned from another.
//! The executor consults the context before sending and again when the
//! transport returns; the remaining time is handed to the transport as the
//! request timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    canceled: Arc<AtomicBool>,
}

impl Context {
    /// A context that never times out and is only canceled explicitly.
    pub fn background() -> Self {
        Self::default()
    }

    /// A deadline `timeout` from now. A timeout too large to represent as an
    /// `Instant` means no deadline at all.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Marks this context and every clone as canceled.
    ///
    /// The transport is blocking, so a cancel that lands while a request is
    /// in flight does not interrupt it. The call fails with `Canceled` once
    /// the transport returns, which is bounded by the context deadline or the
    /// transport's own 60 second timeout.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fails with `Canceled` or `TimedOut` once the context is done.
    pub fn check(&self) -> Result<(), ApiError> {
        if self.is_canceled() {
            return Err(ApiError::Canceled);
        }
        if matches!(self.remaining(), Some(left) if left.is_zero()) {
            return Err(ApiError::TimedOut);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_context_is_live() {
        let ctx = Context::background();
        assert!(ctx.check().is_ok());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let ctx = Context::with_timeout(Duration::from_secs(30));
        let handle = ctx.clone();
        handle.cancel();

        assert!(ctx.is_canceled());
        assert!(matches!(ctx.check(), Err(ApiError::Canceled)));
    }

    #[test]
    fn elapsed_deadline_reports_timeout() {
        let ctx = Context::with_deadline(Instant::now());
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(ctx.check(), Err(ApiError::TimedOut)));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn oversized_timeout_means_no_deadline() {
        let ctx = Context::with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert!(ctx.check().is_ok());

        ctx.cancel();
        assert!(matches!(ctx.check(), Err(ApiError::Canceled)));
    }

    #[test]
    fn cancellation_wins_over_timeout() {
        let ctx = Context::with_deadline(Instant::now());
        ctx.cancel();
        assert!(matches!(ctx.check(), Err(ApiError::Canceled)));
    }
}
