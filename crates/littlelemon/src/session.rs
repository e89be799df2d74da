//! Persistent session and profile store.
//!
//! A small key-value table holding the login flag, the first-run flag and the
//! serialized profile. Flags are presence markers: a key is either stored
//! with the value `"true"` or absent.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::profile::ProfileData;
use crate::storage::schema::CREATE_SESSION_TABLE;
use crate::storage::{open_connection, open_memory_connection};

/// Key of the login flag.
pub const LOGGED_IN_KEY: &str = "LoggedIn";

/// Key of the first-run follow-up flag.
pub const IS_FIRST_TIME_KEY: &str = "IsFirstTime";

/// Key of the serialized profile record.
pub const PROFILE_KEY: &str = "profileData";

const FLAG_VALUE: &str = "true";

/// Durable session state for one device.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    conn: Connection,
}

impl SessionStore {
    /// Open or create the session database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_connection(&path)?;
        conn.execute(CREATE_SESSION_TABLE, [])?;
        Ok(Self { path, conn })
    }

    /// Create an in-memory session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = open_memory_connection()?;
        conn.execute(CREATE_SESSION_TABLE, [])?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM session WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            (key, value),
        )?;
        Ok(())
    }

    /// Whether a user has completed onboarding on this device.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.get(LOGGED_IN_KEY)?.is_some())
    }

    /// Whether the first-login follow-up has already been recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_first_time_marked(&self) -> Result<bool> {
        Ok(self.get(IS_FIRST_TIME_KEY)?.is_some())
    }

    /// Record that the first-login follow-up has run.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn mark_first_time(&self) -> Result<()> {
        Self::set(&self.conn, IS_FIRST_TIME_KEY, FLAG_VALUE)
    }

    /// Log the user in and store their initial profile.
    ///
    /// Leaves the first-run flag alone; the launch bootstrap sets it the
    /// first time it sees a logged-in session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn complete_onboarding(&self, profile: &ProfileData) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        let tx = self.conn.unchecked_transaction()?;
        Self::set(&tx, LOGGED_IN_KEY, FLAG_VALUE)?;
        Self::set(&tx, PROFILE_KEY, &json)?;
        tx.commit()?;
        info!("Onboarding completed for {}", profile.profile_email);
        Ok(())
    }

    /// The stored profile, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the record is corrupt.
    pub fn load_profile(&self) -> Result<Option<ProfileData>> {
        match self.get(PROFILE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Replace the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save_profile(&self, profile: &ProfileData) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        Self::set(&self.conn, PROFILE_KEY, &json)?;
        debug!("Profile saved");
        Ok(())
    }

    /// Remove every session and profile key.
    ///
    /// Returns the number of keys removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_session(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM session", [])?;
        info!("Session cleared ({removed} keys)");
        Ok(removed)
    }

    /// Close the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` refuses to close the connection.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, source)| Error::DatabaseClose { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_session() -> SessionStore {
        SessionStore::open_in_memory().expect("failed to create test session store")
    }

    #[test]
    fn test_fresh_store_is_logged_out() {
        let session = create_test_session();
        assert!(!session.is_logged_in().unwrap());
        assert!(!session.is_first_time_marked().unwrap());
        assert!(session.load_profile().unwrap().is_none());
    }

    #[test]
    fn test_complete_onboarding() {
        let session = create_test_session();
        let profile = ProfileData::from_onboarding("Ana", "ana@example.com");

        session.complete_onboarding(&profile).unwrap();

        assert!(session.is_logged_in().unwrap());
        let stored = session.load_profile().unwrap().unwrap();
        assert_eq!(stored.first_name, "Ana");
        assert_eq!(stored, profile);
    }

    #[test]
    fn test_complete_onboarding_does_not_mark_first_time() {
        let session = create_test_session();
        session
            .complete_onboarding(&ProfileData::from_onboarding("Ana", "ana@example.com"))
            .unwrap();
        assert!(!session.is_first_time_marked().unwrap());
    }

    #[test]
    fn test_flags_are_stored_as_true() {
        let session = create_test_session();
        session
            .complete_onboarding(&ProfileData::from_onboarding("Ana", "ana@example.com"))
            .unwrap();
        session.mark_first_time().unwrap();

        assert_eq!(session.get(LOGGED_IN_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(
            session.get(IS_FIRST_TIME_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_save_profile_replaces_record() {
        let session = create_test_session();
        session
            .complete_onboarding(&ProfileData::from_onboarding("Ana", "ana@example.com"))
            .unwrap();

        let mut edited = session.load_profile().unwrap().unwrap();
        edited.last_name = "Lopez".to_string();
        edited.special_offers = true;
        session.save_profile(&edited).unwrap();

        assert_eq!(session.load_profile().unwrap().unwrap(), edited);
    }

    #[test]
    fn test_clear_session_removes_everything() {
        let session = create_test_session();
        session
            .complete_onboarding(&ProfileData::from_onboarding("Ana", "ana@example.com"))
            .unwrap();
        session.mark_first_time().unwrap();

        assert_eq!(session.clear_session().unwrap(), 3);
        assert!(!session.is_logged_in().unwrap());
        assert!(!session.is_first_time_marked().unwrap());
        assert!(session.load_profile().unwrap().is_none());
    }

    #[test]
    fn test_clear_empty_session() {
        let session = create_test_session();
        assert_eq!(session.clear_session().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_profile_is_json_error() {
        let session = create_test_session();
        SessionStore::set(&session.conn, PROFILE_KEY, "{not json").unwrap();
        assert!(matches!(session.load_profile(), Err(Error::Json(_))));
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");

        let session = SessionStore::open(&path).unwrap();
        session
            .complete_onboarding(&ProfileData::from_onboarding("Ana", "ana@example.com"))
            .unwrap();
        session.close().unwrap();

        let session = SessionStore::open(&path).unwrap();
        assert!(session.is_logged_in().unwrap());
        assert_eq!(session.load_profile().unwrap().unwrap().first_name, "Ana");
    }
}
