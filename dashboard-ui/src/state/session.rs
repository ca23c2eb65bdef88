//! localStorage session record
//!
//! Same record and key as the native file store, kept under
//! `localStorage["auth_tokens"]`.

use energy_monitor::models::AuthTokens;
use energy_monitor::session::{decode_record, encode_record, SessionError, SessionResult, SESSION_KEY};
use energy_monitor::SessionStore;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Session store over `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSession;

impl SessionStore for LocalStorageSession {
    fn load(&self) -> Option<AuthTokens> {
        let raw = storage()?.get_item(SESSION_KEY).ok()??;
        match decode_record(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                web_sys::console::warn_1(&format!("Discarding stored session: {}", e).into());
                self.clear();
                None
            }
        }
    }

    fn save(&self, tokens: &AuthTokens) -> SessionResult<()> {
        let storage =
            storage().ok_or_else(|| SessionError::Unavailable("localStorage".to_string()))?;
        storage
            .set_item(SESSION_KEY, &encode_record(tokens)?)
            .map_err(|_| SessionError::Unavailable("localStorage write rejected".to_string()))
    }

    fn clear(&self) {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}
