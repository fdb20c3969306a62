//! Global "something is loading" indicator.
//!
//! The indicator is driven by a count of pending operations rather than a
//! single flag, so an early-finishing call cannot clear it while another is
//! still running. Every increment is paired with a decrement by an RAII
//! [`LoadingGuard`].

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

/// Delay between a tracked future settling and its guard being released.
pub const DEFAULT_LOADING_GRACE: Duration = Duration::from_millis(50);

struct LoadingState {
    pending: Mutex<usize>,
    flag: watch::Sender<bool>,
}

impl LoadingState {
    fn adjust(&self, apply: impl FnOnce(usize) -> usize) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = apply(*pending);
        self.flag.send_replace(*pending > 0);
    }
}

/// Shared pending-operation counter.
#[derive(Clone)]
pub struct LoadingTracker {
    state: Arc<LoadingState>,
    grace: Duration,
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new(DEFAULT_LOADING_GRACE)
    }
}

impl LoadingTracker {
    /// Tracker releasing guards `grace` after wrapped futures settle.
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            state: Arc::new(LoadingState {
                pending: Mutex::new(0),
                flag,
            }),
            grace,
        }
    }

    /// Whether at least one tracked operation is pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.state.flag.borrow()
    }

    /// Number of pending operations.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self
            .state
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.flag.subscribe()
    }

    /// Count one operation as pending until the guard drops.
    #[must_use = "the operation stops counting as soon as the guard drops"]
    pub fn begin(&self) -> LoadingGuard {
        self.state.adjust(|pending| pending.saturating_add(1));
        LoadingGuard {
            state: Arc::clone(&self.state),
        }
    }

    /// Run `fut` with the indicator raised, holding it for the grace delay
    /// after the future settles. The output, including any error, is passed
    /// through untouched.
    pub async fn with_loading<F: Future>(&self, fut: F) -> F::Output {
        let _guard = self.begin();
        let output = fut.await;
        if !self.grace.is_zero() {
            tokio::time::sleep(self.grace).await;
        }
        output
    }
}

/// Keeps one operation counted as pending.
pub struct LoadingGuard {
    state: Arc<LoadingState>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.adjust(|pending| pending.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{Instant, sleep, sleep_until};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn overlapping_calls_keep_the_flag_until_the_last_settles() {
        let tracker = LoadingTracker::new(DEFAULT_LOADING_GRACE);
        let start = Instant::now();

        let slow = tokio::spawn({
            let tracker = tracker.clone();
            async move { tracker.with_loading(sleep(Duration::from_millis(1000))).await }
        });
        let fast = tokio::spawn({
            let tracker = tracker.clone();
            async move { tracker.with_loading(sleep(Duration::from_millis(100))).await }
        });

        sleep_until(start + Duration::from_millis(500)).await;
        assert!(tracker.is_loading(), "slow call still pending at 500ms");
        assert_eq!(tracker.pending(), 1);

        sleep_until(start + Duration::from_millis(1100)).await;
        assert!(!tracker.is_loading(), "both calls settled by 1100ms");

        slow.await.expect("slow task");
        fast.await.expect("fast task");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_futures_still_lower_the_flag() {
        let tracker = LoadingTracker::default();
        let result: Result<(), &str> = tracker.with_loading(async { Err("boom") }).await;
        assert_eq!(result, Err("boom"));
        assert!(!tracker.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_futures_release_their_guard() {
        let tracker = LoadingTracker::default();
        let task = tokio::spawn({
            let tracker = tracker.clone();
            async move { tracker.with_loading(sleep(Duration::from_secs(60))).await }
        });
        sleep(Duration::from_millis(10)).await;
        assert!(tracker.is_loading());

        task.abort();
        assert!(task.await.is_err());
        assert!(!tracker.is_loading());
    }

    #[test]
    fn guards_count_nested_operations() {
        let tracker = LoadingTracker::default();
        let outer = tracker.begin();
        let inner = tracker.begin();
        drop(outer);
        assert!(tracker.is_loading());
        drop(inner);
        assert!(!tracker.is_loading());
    }
}
