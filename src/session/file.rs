//! File-backed session store
//!
//! Keeps the session record as a single JSON file, the native stand-in for
//! the browser's `localStorage` entry.

use std::path::{Path, PathBuf};

use super::{decode_record, encode_record, SessionResult, SessionStore, SESSION_KEY};
use crate::models::AuthTokens;

/// Session record stored in `<dir>/auth_tokens.json`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside a directory, using the standard file name
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", SESSION_KEY)))
    }

    /// Default location under the user's local data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("energy-monitor"))
            .unwrap_or_else(|| PathBuf::from("./energy_monitor_data"))
            .join(format!("{}.json", SESSION_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<AuthTokens> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = ?self.path, "Failed to read session file: {}", e);
                return None;
            }
        };

        match decode_record(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!(path = ?self.path, "Discarding corrupt session record: {}", e);
                self.clear();
                None
            }
        }
    }

    fn save(&self, tokens: &AuthTokens) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write then rename so a crash never leaves half a record behind
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, encode_record(tokens)?)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = ?self.path, "Session record saved");
        Ok(())
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = ?self.path, "Session record removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = ?self.path, "Failed to remove session file: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_clear() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path().join("nested"));

        assert!(store.load().is_none());

        store.save(&AuthTokens::new("access", "refresh")).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.access_token().as_deref(), Some("access"));

        store.clear();
        assert!(!store.path().exists());
        assert!(store.load().is_none());

        // Clearing twice is fine
        store.clear();
    }

    #[test]
    fn test_corrupt_record_is_removed() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::in_dir(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_none());
        assert!(!store.path().exists());
    }
}
