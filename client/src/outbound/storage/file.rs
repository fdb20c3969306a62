//! JSON file credential store built on `cap_std`.
//!
//! The session lives in one JSON object inside the configured directory.
//! Keys outside the session layout are preserved across saves and clears.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::StoredSession;
use crate::domain::ports::{
    CredentialStore, CredentialStoreError, SessionEntries, clear_session_entries,
    session_from_entries, session_to_entries,
};

/// File holding the session entries inside the session directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Credential store persisting entries to `<dir>/session.json`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    directory: PathBuf,
}

impl FileCredentialStore {
    /// Store rooted at `directory`; the directory is created on first save.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory holding the session file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn open_existing(&self) -> Result<Option<Dir>, CredentialStoreError> {
        match Dir::open_ambient_dir(&self.directory, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(self.io_error(&error)),
        }
    }

    fn open_or_create(&self) -> Result<Dir, CredentialStoreError> {
        Dir::create_ambient_dir_all(&self.directory, ambient_authority())
            .map_err(|error| self.io_error(&error))?;
        Dir::open_ambient_dir(&self.directory, ambient_authority())
            .map_err(|error| self.io_error(&error))
    }

    fn read_entries(&self, dir: &Dir) -> Result<SessionEntries, CredentialStoreError> {
        let raw = match dir.read_to_string(SESSION_FILE_NAME) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(SessionEntries::new());
            }
            Err(error) => return Err(self.io_error(&error)),
        };
        if raw.trim().is_empty() {
            return Ok(SessionEntries::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            CredentialStoreError::corrupt(format!("{SESSION_FILE_NAME}: {error}"))
        })
    }

    fn write_entries(
        &self,
        dir: &Dir,
        entries: &SessionEntries,
    ) -> Result<(), CredentialStoreError> {
        if entries.is_empty() {
            return match dir.remove_file(SESSION_FILE_NAME) {
                Ok(()) => Ok(()),
                Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(error) => Err(self.io_error(&error)),
            };
        }
        let encoded = serde_json::to_vec_pretty(entries)
            .map_err(|error| CredentialStoreError::corrupt(error.to_string()))?;
        let staged = format!(".{SESSION_FILE_NAME}.{}", Uuid::new_v4().simple());
        dir.write(&staged, encoded)
            .map_err(|error| self.io_error(&error))?;
        dir.rename(&staged, dir, SESSION_FILE_NAME).map_err(|error| {
            let _cleanup_result = dir.remove_file(&staged);
            self.io_error(&error)
        })
    }

    fn io_error(&self, error: &io::Error) -> CredentialStoreError {
        CredentialStoreError::io(format!("{}: {error}", self.directory.display()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredSession>, CredentialStoreError> {
        let Some(dir) = self.open_existing()? else {
            return Ok(None);
        };
        session_from_entries(&self.read_entries(&dir)?)
    }

    fn save(&self, session: &StoredSession) -> Result<(), CredentialStoreError> {
        let dir = self.open_or_create()?;
        let mut entries = self.read_entries(&dir).unwrap_or_default();
        clear_session_entries(&mut entries);
        entries.extend(session_to_entries(session)?);
        self.write_entries(&dir, &entries)?;
        debug!(
            directory = %self.directory.display(),
            token = %session.credential.token.fingerprint(),
            "session saved"
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialStoreError> {
        let Some(dir) = self.open_existing()? else {
            return Ok(());
        };
        let mut entries = self.read_entries(&dir).unwrap_or_default();
        clear_session_entries(&mut entries);
        self.write_entries(&dir, &entries)?;
        debug!(directory = %self.directory.display(), "session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{LEGACY_TOKEN_KEY, TOKEN_KEY};
    use crate::domain::{BearerToken, SessionCredential, SessionUser};
    use tempfile::TempDir;

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
                role: None,
            }),
        }
    }

    fn write_raw(dir: &TempDir, contents: &str) {
        let handle = Dir::open_ambient_dir(dir.path(), ambient_authority()).expect("open dir");
        handle
            .write(SESSION_FILE_NAME, contents)
            .expect("write session file");
    }

    fn read_raw(dir: &TempDir) -> SessionEntries {
        let handle = Dir::open_ambient_dir(dir.path(), ambient_authority()).expect("open dir");
        let raw = handle
            .read_to_string(SESSION_FILE_NAME)
            .expect("read session file");
        serde_json::from_str(&raw).expect("json entries")
    }

    #[test]
    fn missing_directories_hold_no_session() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("absent"));
        assert!(store.load().expect("load").is_none());
        store.clear().expect("clearing nothing succeeds");
    }

    #[test]
    fn saved_sessions_survive_a_new_store_instance() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("nested");
        FileCredentialStore::new(&nested)
            .save(&session())
            .expect("save");

        let reloaded = FileCredentialStore::new(&nested).load().expect("load");
        assert_eq!(reloaded, Some(session()));
    }

    #[test]
    fn clear_removes_session_keys_but_keeps_unrelated_ones() {
        let dir = TempDir::new().expect("tempdir");
        write_raw(
            &dir,
            r#"{"auth_token":"legacy","theme":"dark","token":"T"}"#,
        );
        let store = FileCredentialStore::new(dir.path());

        store.clear().expect("clear");

        let remaining = read_raw(&dir);
        assert_eq!(remaining.keys().collect::<Vec<_>>(), vec!["theme"]);
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn legacy_tokens_are_read_and_replaced_on_save() {
        let dir = TempDir::new().expect("tempdir");
        write_raw(&dir, r#"{"auth_token":"legacy"}"#);
        let store = FileCredentialStore::new(dir.path());

        let loaded = store.load().expect("load").expect("session");
        assert_eq!(loaded.credential.token.expose(), "legacy");

        store.save(&session()).expect("save");
        let entries = read_raw(&dir);
        assert_eq!(entries.get(TOKEN_KEY).map(String::as_str), Some("T"));
        assert!(!entries.contains_key(LEGACY_TOKEN_KEY));
    }

    #[test]
    fn unreadable_files_are_reported_as_corrupt() {
        let dir = TempDir::new().expect("tempdir");
        write_raw(&dir, "{not json");
        let err = FileCredentialStore::new(dir.path())
            .load()
            .expect_err("corrupt file");
        assert_eq!(err.label(), "Corrupt");
    }
}
