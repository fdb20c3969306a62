//! In-process credential store.

use std::sync::{Mutex, PoisonError};

use crate::domain::StoredSession;
use crate::domain::ports::{
    CredentialStore, CredentialStoreError, SessionEntries, clear_session_entries,
    session_from_entries, session_to_entries,
};

/// Credential store that keeps entries in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<SessionEntries>,
}

impl MemoryCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw entries, e.g. a session written under the
    /// legacy key.
    #[must_use]
    pub fn with_entries(entries: SessionEntries) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Copy of the raw entries.
    #[must_use]
    pub fn entries(&self) -> SessionEntries {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionEntries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredSession>, CredentialStoreError> {
        session_from_entries(&self.lock())
    }

    fn save(&self, session: &StoredSession) -> Result<(), CredentialStoreError> {
        let fresh = session_to_entries(session)?;
        let mut entries = self.lock();
        clear_session_entries(&mut entries);
        entries.extend(fresh);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        clear_session_entries(&mut self.lock());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LEGACY_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_KEY};
    use crate::domain::{BearerToken, SessionCredential};

    fn session(token: &str) -> StoredSession {
        StoredSession {
            credential: SessionCredential::new(BearerToken::new(token).expect("token")),
            user: None,
        }
    }

    #[test]
    fn reads_sessions_written_under_the_legacy_key() {
        let mut entries = SessionEntries::new();
        entries.insert(LEGACY_TOKEN_KEY.to_owned(), "old".to_owned());
        let store = MemoryCredentialStore::with_entries(entries);

        let loaded = store.load().expect("load").expect("session");
        assert_eq!(loaded.credential.token.expose(), "old");

        store.clear().expect("clear");
        assert!(store.entries().is_empty());
    }

    #[test]
    fn saving_replaces_stale_refresh_tokens() {
        let store = MemoryCredentialStore::new();
        let mut first = session("A");
        first.credential.refresh_token = Some(BearerToken::new("R").expect("refresh"));
        store.save(&first).expect("save");
        store.save(&session("B")).expect("save");

        let entries = store.entries();
        assert_eq!(entries.get(TOKEN_KEY).map(String::as_str), Some("B"));
        assert!(!entries.contains_key(REFRESH_TOKEN_KEY));
    }
}
