//! Account profile and password management.

use super::account::{PasswordChange, ProfilePayload, ProfileUpdate, UserProfile};
use super::auth::PASSWORD_MIN_LENGTH;
use super::call_state::CallTracker;
use super::error::{ClassifiedError, ServiceError};
use super::operations::account::{ChangePassword, GetMyProfile, UpdateProfile};
use super::operations::{Acknowledgement, NoVariables};
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};

/// Reads and edits the signed-in user's profile.
#[derive(Clone)]
pub struct ProfileService {
    hook: ServiceHook,
}

impl ProfileService {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            hook: ServiceHook::new(context),
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Profile of the signed-in user; `None` when the server does not
    /// recognise the session.
    pub async fn my_profile(&self) -> Result<Option<UserProfile>, ClassifiedError> {
        self.hook
            .query::<GetMyProfile>(
                &NoVariables {},
                CallSpec::new("load profile").requires_credential(),
            )
            .await
    }

    pub async fn update_profile(
        &self,
        changes: ProfileUpdate,
    ) -> Result<ProfilePayload, ClassifiedError> {
        let spec = CallSpec::new("update profile")
            .requires_credential()
            .notify_success("Profile updated");
        let blank = |field: &Option<String>| field.as_deref().is_some_and(|v| v.trim().is_empty());
        if blank(&changes.first_name) || blank(&changes.last_name) {
            return Err(self
                .hook
                .reject(ServiceError::validation("Name fields cannot be blank"), &spec));
        }
        self.hook.mutate::<UpdateProfile>(&changes, spec).await
    }

    /// Change the account password.
    ///
    /// The new password must be at least [`PASSWORD_MIN_LENGTH`] characters
    /// and differ from the current one.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<Acknowledgement, ClassifiedError> {
        let spec = CallSpec::new("change password")
            .requires_credential()
            .notify_success("Password changed");
        if let Err(reason) = validate_password_change(current_password, new_password) {
            return Err(self.hook.reject(reason, &spec));
        }
        let change = PasswordChange::new(current_password, new_password);
        self.hook.mutate::<ChangePassword>(&change, spec).await
    }
}

fn validate_password_change(current: &str, new: &str) -> Result<(), ServiceError> {
    if current.is_empty() {
        return Err(ServiceError::validation("Current password is required"));
    }
    if new.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ServiceError::validation(format!(
            "New password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }
    if new == current {
        return Err(ServiceError::validation(
            "New password must differ from the current one",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::error::ErrorClass;
    use crate::test_support::{RecordingNotifier, ScriptedTransport, signed_in_cell};

    fn service(transport: &Arc<ScriptedTransport>) -> ProfileService {
        ProfileService::new(ServiceContext::new(
            transport.clone(),
            Arc::new(signed_in_cell("T")),
            Arc::new(RecordingNotifier::default()),
        ))
    }

    #[rstest]
    #[case("", "long-enough", "Current password is required")]
    #[case("old-secret", "short", "New password must be at least 8 characters")]
    #[case("same-secret", "same-secret", "New password must differ from the current one")]
    #[tokio::test]
    async fn weak_password_changes_are_rejected_locally(
        #[case] current: &str,
        #[case] new: &str,
        #[case] expected: &str,
    ) {
        let transport = Arc::new(ScriptedTransport::new());
        let err = service(&transport)
            .change_password(current, new)
            .await
            .expect_err("rejected");
        assert_eq!(err.message(), expected);
        assert_eq!(err.class(), ErrorClass::Operation);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn wrong_current_password_is_reported_by_the_server() {
        let transport = Arc::new(ScriptedTransport::new().respond(json!({
            "changePassword": { "success": false, "message": "Current password is incorrect" }
        })));
        let err = service(&transport)
            .change_password("old-secret", "new-secret")
            .await
            .expect_err("server rejects");
        assert_eq!(err.message(), "Current password is incorrect");
        assert_eq!(
            transport.requests()[0].request.variables,
            json!({ "currentPassword": "old-secret", "newPassword": "new-secret" })
        );
    }

    #[tokio::test]
    async fn profile_is_loaded_with_the_session() {
        let transport = Arc::new(ScriptedTransport::new().respond(json!({
            "me": { "id": "u1", "email": "a@b.com", "firstName": "Ada" }
        })));
        let profile = service(&transport)
            .my_profile()
            .await
            .expect("profile")
            .expect("known user");
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
    }
}
