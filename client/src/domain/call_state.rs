//! Call-local `loading`/`error` state owned by one service instance.

use std::sync::Arc;

use tokio::sync::watch;

use super::error::ClassifiedError;

/// Outcome of the most recent call made through a service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CallStatus {
    /// No call made yet, or the last one was abandoned.
    #[default]
    Idle,
    /// A call is in flight.
    Pending,
    /// The last call resolved.
    Succeeded,
    /// The last call failed.
    Failed(ClassifiedError),
}

impl CallStatus {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Error of the last failed call.
    #[must_use]
    pub const fn error(&self) -> Option<&ClassifiedError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Observable call status.
///
/// Clones observe and update the same status; concurrent calls race and the
/// last to settle wins.
#[derive(Debug, Clone)]
pub struct CallTracker {
    sender: Arc<watch::Sender<CallStatus>>,
}

impl Default for CallTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CallTracker {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(CallStatus::Idle);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Snapshot of the current status.
    #[must_use]
    pub fn status(&self) -> CallStatus {
        self.sender.borrow().clone()
    }

    /// Whether a call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.sender.borrow().is_pending()
    }

    /// Error of the last failed call.
    #[must_use]
    pub fn error(&self) -> Option<ClassifiedError> {
        self.sender.borrow().error().cloned()
    }

    /// Watch status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CallStatus> {
        self.sender.subscribe()
    }

    /// Mark a call as started, clearing any previous error.
    ///
    /// The returned guard resets the status to [`CallStatus::Idle`] when it
    /// is dropped without being settled, e.g. when the calling future is
    /// cancelled.
    #[must_use = "dropping the guard immediately abandons the call"]
    pub fn begin(&self) -> CallGuard {
        self.sender.send_replace(CallStatus::Pending);
        CallGuard {
            sender: Arc::clone(&self.sender),
            settled: false,
        }
    }
}

/// Keeps a tracker in [`CallStatus::Pending`] for the lifetime of one call.
#[derive(Debug)]
pub struct CallGuard {
    sender: Arc<watch::Sender<CallStatus>>,
    settled: bool,
}

impl CallGuard {
    /// Record success.
    pub fn succeed(mut self) {
        self.settle(CallStatus::Succeeded);
    }

    /// Record failure.
    pub fn fail(mut self, error: ClassifiedError) {
        self.settle(CallStatus::Failed(error));
    }

    fn settle(&mut self, status: CallStatus) {
        self.settled = true;
        self.sender.send_replace(status);
    }
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.sender.send_replace(CallStatus::Idle);
        }
    }
}
