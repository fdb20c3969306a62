//! Reminder operations.

use serde::Serialize;

use super::{Acknowledgement, NoVariables, define_operation};
use crate::domain::ids::ReminderId;
use crate::domain::reminder::{NewReminder, Reminder, ReminderPayload, ReminderUpdate};

/// Variables naming one reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRef {
    pub reminder_id: ReminderId,
}

/// Variables for `updateReminder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderVariables {
    pub reminder_id: ReminderId,
    #[serde(flatten)]
    pub changes: ReminderUpdate,
}

define_operation! {
    /// Reminders of the signed-in user.
    query GetMyReminders {
        variables: NoVariables,
        output: Vec<Reminder>,
        root: "myReminders",
        declare: [],
        selection: " { id courseId title message remindAt frequency isActive }",
    }
}

define_operation! {
    /// Schedule a reminder.
    mutation CreateReminder {
        variables: NewReminder,
        output: ReminderPayload,
        root: "createReminder",
        declare: [
            "title": "String!",
            "message": "String",
            "remindAt": "String!",
            "frequency": "ReminderFrequency" = "ONCE",
            "courseId": "Int",
        ],
        selection: "(title: $title, message: $message, remindAt: $remindAt, frequency: $frequency, courseId: $courseId) { success message reminder { id courseId title message remindAt frequency isActive } }",
    }
}

define_operation! {
    /// Edit or pause a reminder.
    mutation UpdateReminder {
        variables: UpdateReminderVariables,
        output: ReminderPayload,
        root: "updateReminder",
        declare: [
            "reminderId": "Int!",
            "title": "String",
            "message": "String",
            "remindAt": "String",
            "frequency": "ReminderFrequency",
            "isActive": "Boolean",
        ],
        selection: "(reminderId: $reminderId, title: $title, message: $message, remindAt: $remindAt, frequency: $frequency, isActive: $isActive) { success message reminder { id courseId title message remindAt frequency isActive } }",
    }
}

define_operation! {
    /// Remove a reminder.
    mutation DeleteReminder {
        variables: ReminderRef,
        output: Acknowledgement,
        root: "deleteReminder",
        declare: ["reminderId": "Int!"],
        selection: "(reminderId: $reminderId) { success message }",
    }
}
