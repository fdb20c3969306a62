//! Study reminders.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;

use super::call_state::CallTracker;
use super::error::{ClassifiedError, ServiceError};
use super::ids::ReminderId;
use super::operations::reminders::{
    CreateReminder, DeleteReminder, GetMyReminders, ReminderRef, UpdateReminder,
    UpdateReminderVariables,
};
use super::operations::{Acknowledgement, NoVariables};
use super::reminder::{NewReminder, Reminder, ReminderPayload, ReminderUpdate};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Schedules reminders for the signed-in user.
#[derive(Clone)]
pub struct ReminderService {
    hook: ServiceHook,
    clock: Arc<dyn Clock>,
}

impl ReminderService {
    pub fn new(context: ServiceContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            hook: ServiceHook::new(context),
            clock,
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    pub async fn reminders(&self) -> Result<Vec<Reminder>, ClassifiedError> {
        self.hook
            .query::<GetMyReminders>(
                &NoVariables {},
                CallSpec::new("load reminders").requires_credential(),
            )
            .await
    }

    pub async fn create_reminder(
        &self,
        reminder: NewReminder,
    ) -> Result<ReminderPayload, ClassifiedError> {
        let spec = CallSpec::new("create reminder")
            .requires_credential()
            .notify_success("Reminder scheduled");
        if reminder.title.trim().is_empty() {
            return Err(self
                .hook
                .reject(ServiceError::validation("Reminder title is required"), &spec));
        }
        if let Err(invalid) = self.ensure_future(reminder.remind_at) {
            return Err(self.hook.reject(invalid, &spec));
        }
        self.hook.mutate::<CreateReminder>(&reminder, spec).await
    }

    pub async fn update_reminder(
        &self,
        reminder_id: ReminderId,
        changes: ReminderUpdate,
    ) -> Result<ReminderPayload, ClassifiedError> {
        let spec = CallSpec::new("update reminder")
            .requires_credential()
            .notify_success("Reminder updated");
        if let Some(Err(invalid)) = changes.remind_at.map(|at| self.ensure_future(at)) {
            return Err(self.hook.reject(invalid, &spec));
        }
        self.hook
            .mutate::<UpdateReminder>(
                &UpdateReminderVariables {
                    reminder_id,
                    changes,
                },
                spec,
            )
            .await
    }

    pub async fn delete_reminder(
        &self,
        reminder_id: ReminderId,
    ) -> Result<Acknowledgement, ClassifiedError> {
        self.hook
            .mutate::<DeleteReminder>(
                &ReminderRef { reminder_id },
                CallSpec::new("delete reminder")
                    .requires_credential()
                    .notify_success("Reminder deleted"),
            )
            .await
    }

    fn ensure_future(&self, remind_at: DateTime<Utc>) -> Result<(), ServiceError> {
        if remind_at <= self.clock.utc() {
            return Err(ServiceError::validation(
                "Reminder time must be in the future",
            ));
        }
        Ok(())
    }
}
