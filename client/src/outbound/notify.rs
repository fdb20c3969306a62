//! Notification sinks.

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::domain::ports::{Notification, NotificationLevel, Notifier};

/// Default capacity of the broadcast channel.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(text = %notification.message, "notification"),
            NotificationLevel::Error => warn!(
                text = %notification.message,
                class = ?notification.class,
                "notification"
            ),
        }
    }
}

/// Fans notifications out to any number of subscribers.
///
/// Notifications sent while nobody is subscribed are dropped; a lagging
/// subscriber loses the oldest entries.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    /// Channel holding up to `capacity` undelivered notifications.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every notification sent from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAPACITY)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        // No subscribers is not an error for a toast.
        let _delivered = self.sender.send(notification);
    }
}
