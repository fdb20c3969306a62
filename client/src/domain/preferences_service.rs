//! Notification and display preferences.

use super::account::{PreferencesPayload, PreferencesUpdate, UserPreferences};
use super::call_state::CallTracker;
use super::error::ClassifiedError;
use super::operations::NoVariables;
use super::operations::account::{GetMyPreferences, UpdatePreferences};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Reads and edits the signed-in user's preferences.
#[derive(Clone)]
pub struct PreferencesService {
    hook: ServiceHook,
}

impl PreferencesService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    pub async fn my_preferences(&self) -> Result<Option<UserPreferences>, ClassifiedError> {
        self.hook
            .query::<GetMyPreferences>(
                &NoVariables {},
                CallSpec::new("load preferences").requires_credential(),
            )
            .await
    }

    pub async fn update_preferences(
        &self,
        changes: PreferencesUpdate,
    ) -> Result<PreferencesPayload, ClassifiedError> {
        self.hook
            .mutate::<UpdatePreferences>(
                &changes,
                CallSpec::new("update preferences")
                    .requires_credential()
                    .notify_success("Preferences saved"),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::domain::error::ErrorClass;
    use crate::domain::ports::GraphqlTransportError;
    use crate::test_support::{RecordingNotifier, ScriptedTransport, signed_in_cell};

    #[tokio::test]
    async fn rejected_sessions_are_classified_as_authentication() {
        let transport = Arc::new(ScriptedTransport::new().fail(GraphqlTransportError::protocol(
            "You must be signed in",
            Some("UNAUTHENTICATED".to_owned()),
        )));
        let notifier = Arc::new(RecordingNotifier::default());
        let service = PreferencesService::new(ServiceContext::new(
            transport.clone(),
            Arc::new(signed_in_cell("expired")),
            notifier.clone(),
        ));

        let err = service.my_preferences().await.expect_err("rejected");
        assert_eq!(err.class(), ErrorClass::Authentication);
        assert_eq!(notifier.errors()[0].class, Some(ErrorClass::Authentication));
    }

    #[tokio::test]
    async fn updates_send_only_changed_preferences() {
        let transport = Arc::new(ScriptedTransport::new().respond(json!({
            "updatePreferences": { "success": true, "preferences": { "theme": "dark" } }
        })));
        let notifier = Arc::new(RecordingNotifier::default());
        let service = PreferencesService::new(ServiceContext::new(
            transport.clone(),
            Arc::new(signed_in_cell("T")),
            notifier.clone(),
        ));

        service
            .update_preferences(PreferencesUpdate {
                theme: Some("dark".to_owned()),
                ..PreferencesUpdate::default()
            })
            .await
            .expect("saved");
        assert_eq!(transport.requests()[0].request.variables, json!({ "theme": "dark" }));
        assert_eq!(notifier.successes(), vec!["Preferences saved".to_owned()]);
    }
}
