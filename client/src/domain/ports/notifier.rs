//! Port for transient user-facing notifications ("toasts").

use crate::domain::error::{ClassifiedError, ErrorClass};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// One user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Present on error notifications.
    pub class: Option<ErrorClass>,
}

impl Notification {
    /// Success toast.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            class: None,
        }
    }

    /// Error toast carrying the classified message.
    #[must_use]
    pub fn failure(error: &ClassifiedError) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: error.message().to_owned(),
            class: Some(error.class()),
        }
    }
}

/// Delivers notifications to whatever surface shows them.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
