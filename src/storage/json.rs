//! JSON file-based session storage.
//!
//! The token lives in a small JSON document. Writes go to a temporary file
//! that is then renamed over the real one, so a crash never leaves a
//! half-written session behind.

use crate::domain::error::{BankflowError, Result};
use crate::storage::backend::SessionStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name used inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionData {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Session token persisted to `<data_dir>/session.json`.
///
/// # Example
///
/// ```rust
/// use bankflow::storage::{JsonSessionStore, SessionStore};
///
/// let dir = tempfile::tempdir()?;
/// let mut store = JsonSessionStore::in_dir(dir.path());
/// store.save("fixture-token-1")?;
///
/// let reopened = JsonSessionStore::in_dir(dir.path());
/// assert_eq!(reopened.load()?.as_deref(), Some("fixture-token-1"));
/// # Ok::<(), bankflow::BankflowError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    file_path: PathBuf,
}

impl JsonSessionStore {
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    #[must_use]
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn write(&self, data: &SessionData) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| BankflowError::Storage(format!("failed to serialize session: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "session saved");
        Ok(())
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        let data: SessionData = serde_json::from_str(&contents)
            .map_err(|e| BankflowError::Storage(format!("failed to parse session file: {e}")))?;

        if data.version != FORMAT_VERSION {
            tracing::warn!(version = data.version, "ignoring session file with unknown version");
            return Ok(None);
        }
        Ok(data.token.filter(|t| !t.is_empty()))
    }

    fn save(&mut self, token: &str) -> Result<()> {
        self.write(&SessionData {
            version: FORMAT_VERSION,
            token: Some(token.to_string()),
        })
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => {
                tracing::debug!(path = ?self.file_path, "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSessionStore::in_dir(&dir.path().join("nested"));
        store.save("t-1").unwrap();
        store.save("t-2").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("t-2"));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSessionStore::in_dir(dir.path());
        store.save("t-1").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(BankflowError::Storage(_))));
    }

    #[test]
    fn unknown_version_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSessionStore::in_dir(dir.path());
        std::fs::write(store.path(), r#"{"version": 9, "token": "old"}"#).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
