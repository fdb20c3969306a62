//! Read access to the session credential for outbound calls.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::session::SessionCredential;

/// Supplies the credential attached to authenticated calls.
pub trait CredentialSource: Send + Sync {
    /// Credential currently held, if any.
    fn current(&self) -> Option<SessionCredential>;

    /// Whether a credential is held.
    fn is_present(&self) -> bool {
        self.current().is_some()
    }
}

/// Shared, in-process holder of the session credential.
///
/// Clones share one slot. The auth context is the only writer; the
/// transport and services only read.
#[derive(Debug, Clone, Default)]
pub struct SessionCell {
    slot: Arc<RwLock<Option<SessionCredential>>>,
}

impl SessionCell {
    /// Empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell pre-loaded with `credential`.
    #[must_use]
    pub fn with_credential(credential: SessionCredential) -> Self {
        let cell = Self::new();
        cell.replace(Some(credential));
        cell
    }

    /// Swap the held credential, returning the previous one.
    pub fn replace(&self, credential: Option<SessionCredential>) -> Option<SessionCredential> {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, credential)
    }

    /// Drop the held credential.
    pub fn clear(&self) {
        self.replace(None);
    }
}

impl CredentialSource for SessionCell {
    fn current(&self) -> Option<SessionCredential> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
