use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// why an operation stopped before completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Cancelled,
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// cancellation signal and optional deadline passed to every operation.
/// clones observe the same signal
#[derive(Debug, Clone)]
pub struct Context {
    cancelled: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

/// cancels every [`Context`] derived from it
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// context that is never cancelled and has no deadline
    pub fn background() -> Self {
        let (_, cancelled) = watch::channel(false);
        Self {
            cancelled,
            deadline: None,
        }
    }

    pub fn with_cancel() -> (Self, CancelHandle) {
        let (sender, cancelled) = watch::channel(false);
        (
            Self {
                cancelled,
                deadline: None,
            },
            CancelHandle(sender),
        )
    }

    /// tighten the deadline, an earlier existing deadline is kept
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// reason this context is already done, if any
    pub fn done(&self) -> Option<CancelReason> {
        if self.is_cancelled() {
            Some(CancelReason::Cancelled)
        } else if matches!(self.deadline, Some(deadline) if deadline <= Instant::now()) {
            Some(CancelReason::DeadlineExceeded)
        } else {
            None
        }
    }

    /// drive `fut` until it completes or the context is done.
    /// the future is dropped on cancellation, aborting any request in flight
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, CancelReason>
    where
        F: Future,
    {
        if let Some(reason) = self.done() {
            return Err(reason);
        }

        let mut cancelled = self.cancelled.clone();
        let deadline = self.deadline;

        tokio::select! {
            output = fut => Ok(output),
            _ = wait_cancelled(&mut cancelled) => Err(CancelReason::Cancelled),
            _ = wait_deadline(deadline) => Err(CancelReason::DeadlineExceeded),
        }
    }
}

async fn wait_cancelled(cancelled: &mut watch::Receiver<bool>) {
    loop {
        if *cancelled.borrow_and_update() {
            return;
        }
        // handle gone, nobody can cancel anymore
        if cancelled.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
