//! Login and registration.
//!
//! Credentials are exchanged without attaching any existing token. A
//! successful response must carry a token; it is handed to the
//! [`AuthContext`], which persists it and makes it visible to the transport.

use std::sync::Arc;

use tracing::info;

use super::auth::{AuthPayload, LoginCredentials, Registration};
use super::call_state::CallTracker;
use super::error::{ClassifiedError, ServiceError};
use super::operations::auth::{Login, Register};
use super::ports::Notification;
use super::service_hook::{CallSpec, ServiceContext, ServiceHook};
use super::session::{BearerToken, SessionCredential, StoredSession};
use crate::context::AuthContext;

/// Exchanges credentials for a session.
#[derive(Clone)]
pub struct AuthService {
    hook: ServiceHook,
    auth: Arc<AuthContext>,
}

impl AuthService {
    pub fn new(context: ServiceContext, auth: Arc<AuthContext>) -> Self {
        Self {
            hook: ServiceHook::new(context),
            auth,
        }
    }

    #[must_use]
    pub const fn tracker(&self) -> &CallTracker {
        self.hook.tracker()
    }

    /// Log in with email and password, returning the full server payload.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ClassifiedError> {
        let spec = CallSpec::new("log in").without_auth();
        let credentials = match LoginCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(invalid) => return Err(self.hook.reject(invalid.into(), &spec)),
        };
        let payload = self.hook.mutate::<Login>(&credentials, spec.clone()).await?;
        self.start_session(&payload, &spec)?;
        info!(email = credentials.email(), "logged in");
        self.hook
            .context()
            .notify(Notification::success("Logged in successfully"));
        Ok(payload)
    }

    /// Create an account and sign in with it.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ClassifiedError> {
        let spec = CallSpec::new("register").without_auth();
        let registration = match Registration::try_new(first_name, last_name, email, password) {
            Ok(registration) => registration,
            Err(invalid) => return Err(self.hook.reject(invalid.into(), &spec)),
        };
        let payload = self.hook.mutate::<Register>(&registration, spec.clone()).await?;
        self.start_session(&payload, &spec)?;
        info!(email = registration.email(), "registered");
        self.hook
            .context()
            .notify(Notification::success("Account created"));
        Ok(payload)
    }

    /// Sign out locally; no request is sent.
    pub fn logout(&self) -> Result<(), ServiceError> {
        self.auth.logout()
    }

    fn start_session(&self, payload: &AuthPayload, spec: &CallSpec) -> Result<(), ClassifiedError> {
        let session = session_from_payload(payload).map_err(|cause| self.hook.reject(cause, spec))?;
        self.auth
            .establish(session)
            .map_err(|cause| self.hook.reject(cause, spec))
    }
}

fn session_from_payload(payload: &AuthPayload) -> Result<StoredSession, ServiceError> {
    let raw = payload
        .token
        .as_deref()
        .ok_or_else(|| ServiceError::domain_failure("The server did not issue a session"))?;
    let token = BearerToken::new(raw).map_err(|err| {
        ServiceError::domain_failure(format!("The server issued an unusable session: {err}"))
    })?;
    let refresh_token = payload
        .refresh_token
        .as_deref()
        .and_then(|raw| BearerToken::new(raw).ok());
    Ok(StoredSession {
        credential: SessionCredential {
            token,
            refresh_token,
        },
        user: payload.user.clone(),
    })
}
