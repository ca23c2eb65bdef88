//! Session Store
//!
//! Holds the access/refresh token pair and the cached user profile.
//! Lifecycle: created on login/register, read before every request,
//! replaced on refresh, deleted on logout or when a refresh fails.
//!
//! Implementations:
//! - [`MemorySessionStore`]: process-local, used in tests and one-shot tools
//! - `FileSessionStore` (feature `native`): a JSON file in the data directory
//! - the browser dashboard keeps the same record in `localStorage`

#[cfg(feature = "native")]
mod file;

#[cfg(feature = "native")]
pub use file::FileSessionStore;

use std::sync::RwLock;
use thiserror::Error;

use crate::models::{AuthTokens, User};

/// Storage key (localStorage) and file stem for the session record
pub const SESSION_KEY: &str = "auth_tokens";

/// Errors from reading or writing the session record
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Persistent holder of the single session record.
///
/// Reads and writes are last-writer-wins; no arbitration between callers.
pub trait SessionStore: Send + Sync {
    /// Current record, or `None` when absent. A corrupt record is deleted
    /// and reported as absent.
    fn load(&self) -> Option<AuthTokens>;

    /// Replace the record
    fn save(&self, tokens: &AuthTokens) -> SessionResult<()>;

    /// Delete the record
    fn clear(&self);

    fn access_token(&self) -> Option<String> {
        self.load().map(|t| t.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.load().map(|t| t.refresh_token)
    }

    fn current_user(&self) -> Option<User> {
        self.load().and_then(|t| t.user)
    }
}

/// Parse a stored record
pub fn decode_record(raw: &str) -> SessionResult<AuthTokens> {
    Ok(serde_json::from_str(raw)?)
}

/// Serialize a record for storage
pub fn encode_record(tokens: &AuthTokens) -> SessionResult<String> {
    Ok(serde_json::to_string(tokens)?)
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: RwLock<Option<AuthTokens>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing record
    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            record: RwLock::new(Some(tokens)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<AuthTokens> {
        self.record.read().ok().and_then(|r| r.clone())
    }

    fn save(&self, tokens: &AuthTokens) -> SessionResult<()> {
        let mut record = self
            .record
            .write()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        *record = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut record) = self.record.write() {
            *record = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());
        assert!(store.access_token().is_none());

        store.save(&AuthTokens::new("access", "refresh")).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("access"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh"));
        assert!(store.current_user().is_none());

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_last_writer_wins() {
        let store = MemorySessionStore::with_tokens(AuthTokens::new("one", "r1"));
        store.save(&AuthTokens::new("two", "r2")).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("two"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_record("not json").is_err());
        let tokens = decode_record(r#"{"accessToken":"a","refreshToken":"b"}"#).unwrap();
        assert_eq!(tokens.refresh_token, "b");
    }
}
