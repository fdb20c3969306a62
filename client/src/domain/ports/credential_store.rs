//! Port for persisting the session between runs.
//!
//! Stores expose the same flat key/value layout regardless of medium:
//! `token`, `refreshToken` and `user` (a JSON string). `token` is
//! authoritative; the legacy `auth_token` key is only read as a fallback
//! and removed on clear.

use std::collections::BTreeMap;

use super::define_port_error;
use crate::domain::session::{BearerToken, SessionCredential, SessionUser, StoredSession};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Key holding the JSON-encoded user summary.
pub const USER_KEY: &str = "user";
/// Legacy key some older sessions stored the token under.
pub const LEGACY_TOKEN_KEY: &str = "auth_token";

define_port_error! {
    /// Errors surfaced by credential stores.
    pub enum CredentialStoreError {
        /// Reading or writing the backing medium failed.
        Io { message: String } => "credential store I/O failed: {message}",
        /// Stored entries could not be interpreted.
        Corrupt { message: String } => "stored session is unreadable: {message}",
    }
}

/// Persists the session credential and cached identity.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Load the stored session, if any.
    fn load(&self) -> Result<Option<StoredSession>, CredentialStoreError>;

    /// Replace the stored session.
    fn save(&self, session: &StoredSession) -> Result<(), CredentialStoreError>;

    /// Remove every stored credential artefact.
    fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// Flat key/value representation shared by store adapters.
pub type SessionEntries = BTreeMap<String, String>;

/// Flatten `session` into store entries.
pub fn session_to_entries(session: &StoredSession) -> Result<SessionEntries, CredentialStoreError> {
    let mut entries = SessionEntries::new();
    entries.insert(
        TOKEN_KEY.to_owned(),
        session.credential.token.expose().to_owned(),
    );
    if let Some(refresh) = &session.credential.refresh_token {
        entries.insert(REFRESH_TOKEN_KEY.to_owned(), refresh.expose().to_owned());
    }
    if let Some(user) = &session.user {
        let encoded = serde_json::to_string(user)
            .map_err(|err| CredentialStoreError::corrupt(err.to_string()))?;
        entries.insert(USER_KEY.to_owned(), encoded);
    }
    Ok(entries)
}

/// Rebuild a session from store entries.
///
/// Returns `None` when neither `token` nor the legacy key holds a token.
pub fn session_from_entries(
    entries: &SessionEntries,
) -> Result<Option<StoredSession>, CredentialStoreError> {
    let Some(raw_token) = entries
        .get(TOKEN_KEY)
        .or_else(|| entries.get(LEGACY_TOKEN_KEY))
        .filter(|raw| !raw.trim().is_empty())
    else {
        return Ok(None);
    };
    let token = BearerToken::new(raw_token.as_str())
        .map_err(|err| CredentialStoreError::corrupt(format!("{TOKEN_KEY}: {err}")))?;
    let refresh_token = entries
        .get(REFRESH_TOKEN_KEY)
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| BearerToken::new(raw.as_str()))
        .transpose()
        .map_err(|err| CredentialStoreError::corrupt(format!("{REFRESH_TOKEN_KEY}: {err}")))?;
    let user = entries
        .get(USER_KEY)
        .map(|raw| serde_json::from_str::<SessionUser>(raw))
        .transpose()
        .map_err(|err| CredentialStoreError::corrupt(format!("{USER_KEY}: {err}")))?;
    Ok(Some(StoredSession {
        credential: SessionCredential {
            token,
            refresh_token,
        },
        user,
    }))
}

/// Remove every key a session may occupy.
pub fn clear_session_entries(entries: &mut SessionEntries) {
    for key in [TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY, LEGACY_TOKEN_KEY] {
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn session() -> StoredSession {
        StoredSession {
            credential: SessionCredential {
                token: BearerToken::new("T").expect("token"),
                refresh_token: Some(BearerToken::new("R").expect("refresh")),
            },
            user: Some(SessionUser {
                id: "u1".to_owned(),
                email: "a@b.com".to_owned(),
                first_name: Some("Ada".to_owned()),
                last_name: None,
                role: Some("INSTRUCTOR".to_owned()),
            }),
        }
    }

    #[test]
    fn entries_use_the_browser_key_layout() {
        let entries = session_to_entries(&session()).expect("flatten");
        assert_eq!(entries.get(TOKEN_KEY).map(String::as_str), Some("T"));
        assert_eq!(entries.get(REFRESH_TOKEN_KEY).map(String::as_str), Some("R"));
        let user: serde_json::Value =
            serde_json::from_str(entries.get(USER_KEY).expect("user entry")).expect("json user");
        assert_eq!(user["firstName"], "Ada");
        assert_eq!(session_from_entries(&entries).expect("rebuild"), Some(session()));
    }

    #[rstest]
    #[case(&[(LEGACY_TOKEN_KEY, "legacy")], Some("legacy"))]
    #[case(&[(TOKEN_KEY, "primary"), (LEGACY_TOKEN_KEY, "legacy")], Some("primary"))]
    #[case(&[(TOKEN_KEY, "  ")], None)]
    #[case(&[], None)]
    fn token_key_wins_over_the_legacy_key(
        #[case] raw: &[(&str, &str)],
        #[case] expected: Option<&str>,
    ) {
        let entries: SessionEntries = raw
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        let loaded = session_from_entries(&entries).expect("load");
        assert_eq!(
            loaded.as_ref().map(|s| s.credential.token.expose()),
            expected
        );
    }

    #[test]
    fn malformed_user_entries_are_reported() {
        let mut entries = SessionEntries::new();
        entries.insert(TOKEN_KEY.to_owned(), "T".to_owned());
        entries.insert(USER_KEY.to_owned(), "{not json".to_owned());
        let err = session_from_entries(&entries).expect_err("corrupt user");
        assert_eq!(err.label(), "Corrupt");
    }

    #[test]
    fn clearing_removes_legacy_artefacts() {
        let mut entries = session_to_entries(&session()).expect("flatten");
        entries.insert(LEGACY_TOKEN_KEY.to_owned(), "old".to_owned());
        entries.insert("theme".to_owned(), "dark".to_owned());
        clear_session_entries(&mut entries);
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["theme"]);
    }
}
