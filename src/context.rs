//! Request Context Module
//!
//! Cooperative cancellation and deadlines carried through cache and
//! repository calls.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// == Context Error ==
/// Reason a context is no longer usable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

// == Context ==
/// Cancellation signal with an optional deadline.
///
/// Clones share the same cancellation token, so cancelling any clone
/// cancels all of them.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now.
    ///
    /// A timeout too large to represent carries no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// A context driven by an externally owned token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason this context is done, if any.
    ///
    /// Cancellation is reported ahead of an elapsed deadline.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.token.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_never_done() {
        let ctx = Context::background();
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_propagates_to_clones() {
        let ctx = Context::background();
        let clone = ctx.clone();

        ctx.cancel();

        assert_eq!(clone.check(), Err(ContextError::Cancelled));
        assert!(ctx.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let ctx = Context::with_timeout(Duration::from_secs(10));
        assert!(ctx.check().is_ok());

        tokio::time::advance(Duration::from_secs(10)).await;

        assert_eq!(ctx.check(), Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_wins_over_deadline() {
        let ctx = Context::with_timeout(Duration::from_millis(1));
        tokio::time::advance(Duration::from_millis(5)).await;
        ctx.cancel();

        assert_eq!(ctx.check(), Err(ContextError::Cancelled));
    }

    #[test]
    fn test_huge_timeout_has_no_deadline() {
        let ctx = Context::with_timeout(Duration::MAX);

        assert_eq!(ctx.deadline(), None);
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn test_external_token() {
        let token = CancellationToken::new();
        let ctx = Context::with_token(token.clone());
        token.cancel();
        assert_eq!(ctx.check(), Err(ContextError::Cancelled));
    }
}
