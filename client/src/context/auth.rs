//! Single source of truth for "who is signed in, and with which token".
//!
//! `AuthContext` owns the [`SessionCell`] every transport call reads and the
//! [`CredentialStore`] that persists it. No other component writes either.

use std::sync::Arc;

use mockable::Clock;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::ServiceError;
use crate::domain::ports::{CredentialSource, CredentialStore, SessionCell};
use crate::domain::session::{SessionUser, StoredSession};

/// Authentication lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// The stored credential has not been checked yet.
    #[default]
    Unknown,
    /// No usable credential is held.
    Unauthenticated,
    /// A credential is held; the cached identity may be missing.
    Authenticated(Option<SessionUser>),
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Cached identity of the signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => user.as_ref(),
            _ => None,
        }
    }
}

/// Owns the session credential and its persistence.
pub struct AuthContext {
    store: Arc<dyn CredentialStore>,
    cell: SessionCell,
    clock: Arc<dyn Clock>,
    state: watch::Sender<AuthState>,
}

impl AuthContext {
    /// Context in the [`AuthState::Unknown`] state with an empty cell.
    pub fn new(store: Arc<dyn CredentialStore>, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self {
            store,
            cell: SessionCell::new(),
            clock,
            state,
        }
    }

    /// Handle to the credential slot read by the transport.
    #[must_use]
    pub fn session_cell(&self) -> SessionCell {
        self.cell.clone()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.borrow().user().cloned()
    }

    /// Check the stored credential and leave the `Unknown` state.
    ///
    /// A JWT whose `exp` claim lies in the past is discarded and the store
    /// cleared. When the store cannot be read the context still settles on
    /// [`AuthState::Unauthenticated`] before the error is returned.
    pub fn initialize(&self) -> Result<AuthState, ServiceError> {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, kind = err.label(), "stored session unreadable");
                self.publish_signed_out();
                return Err(err.into());
            }
        };

        match stored {
            Some(session) if session.credential.token.is_expired_at(self.clock.utc()) => {
                info!(
                    token = %session.credential.token.fingerprint(),
                    "discarding expired session"
                );
                self.publish_signed_out();
                self.store.clear()?;
            }
            Some(session) => self.publish_signed_in(session),
            None => self.publish_signed_out(),
        }
        Ok(self.state())
    }

    /// Persist a freshly issued session and mark the user signed in.
    pub fn establish(&self, session: StoredSession) -> Result<(), ServiceError> {
        self.store.save(&session)?;
        info!(token = %session.credential.token.fingerprint(), "session established");
        self.publish_signed_in(session);
        Ok(())
    }

    /// Forget the session in memory and in the store.
    ///
    /// The in-memory credential is dropped first, so the user is signed out
    /// even when clearing the store fails.
    pub fn logout(&self) -> Result<(), ServiceError> {
        let had_credential = self.cell.is_present();
        self.publish_signed_out();
        self.store.clear()?;
        info!(had_credential, "signed out");
        Ok(())
    }

    fn publish_signed_in(&self, session: StoredSession) {
        let StoredSession { credential, user } = session;
        self.cell.replace(Some(credential));
        self.state.send_replace(AuthState::Authenticated(user));
    }

    fn publish_signed_out(&self) {
        self.cell.clear();
        self.state.send_replace(AuthState::Unauthenticated);
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::ports::{CredentialStoreError, MockCredentialStore};
    use crate::domain::session::{BearerToken, SessionCredential};
    use crate::outbound::storage::MemoryCredentialStore;
    use crate::test_support::FixedClock;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("timestamp"),
        ))
    }

    fn jwt_expiring_at(exp: i64) -> BearerToken {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        BearerToken::new(format!("{header}.{claims}.sig")).expect("token")
    }

    fn session(token: BearerToken) -> StoredSession {
        StoredSession {
            credential: SessionCredential::new(token),
            user: Some(SessionUser {
                id: "u1".to_owned(),
                email: "a@b.com".to_owned(),
                first_name: None,
                last_name: None,
                role: None,
            }),
        }
    }

    #[test]
    fn starts_unknown_and_settles_unauthenticated_without_a_session() {
        let context = AuthContext::new(Arc::new(MemoryCredentialStore::new()), clock());
        assert_eq!(context.state(), AuthState::Unknown);
        assert_eq!(context.initialize().expect("init"), AuthState::Unauthenticated);
    }

    #[test]
    fn restores_a_valid_stored_session() {
        let store = Arc::new(MemoryCredentialStore::new());
        let valid = jwt_expiring_at(
            Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0)
                .single()
                .expect("timestamp")
                .timestamp(),
        );
        store.save(&session(valid.clone())).expect("seed");
        let context = AuthContext::new(store, clock());

        let state = context.initialize().expect("init");
        assert!(state.is_authenticated());
        assert_eq!(
            context.session_cell().current().map(|c| c.token),
            Some(valid)
        );
    }

    #[test]
    fn discards_expired_tokens_and_clears_the_store() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .save(&session(jwt_expiring_at(1_600_000_000)))
            .expect("seed");
        let context = AuthContext::new(store.clone(), clock());

        assert_eq!(context.initialize().expect("init"), AuthState::Unauthenticated);
        assert!(store.load().expect("load").is_none());
        assert!(!context.session_cell().is_present());
    }

    #[test]
    fn logout_clears_memory_even_when_the_store_fails() {
        let mut store = MockCredentialStore::new();
        store.expect_save().returning(|_| Ok(()));
        store
            .expect_clear()
            .returning(|| Err(CredentialStoreError::io("read-only volume")));
        let context = AuthContext::new(Arc::new(store), clock());
        context
            .establish(session(BearerToken::new("T").expect("token")))
            .expect("establish");
        let mut receiver = context.subscribe();

        let err = context.logout().expect_err("store failure surfaces");
        assert!(matches!(err, ServiceError::Storage { .. }));
        assert!(!context.session_cell().is_present());
        assert_eq!(*receiver.borrow_and_update(), AuthState::Unauthenticated);
    }

    #[test]
    fn unreadable_stores_still_leave_the_unknown_state() {
        let mut store = MockCredentialStore::new();
        store
            .expect_load()
            .returning(|| Err(CredentialStoreError::corrupt("user: bad json")));
        let context = AuthContext::new(Arc::new(store), clock());

        assert!(context.initialize().is_err());
        assert_eq!(context.state(), AuthState::Unauthenticated);
    }
}
