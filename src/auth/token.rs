//! Access-token inspection
//!
//! Reads the unverified JWT payload to find out when the access token
//! expires. Signatures are the server's business; the client only needs
//! `exp` to decide whether to refresh before a request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens expiring within this many seconds are refreshed before use
pub const REFRESH_WINDOW_SECS: i64 = 300;

/// Payload carried by the API's access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: serde_json::Value,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is not a three-part JWT")]
    Malformed,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid claims: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Decode the payload segment of a JWT without verifying it
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(TokenError::Malformed),
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// True when the token expires within `window_secs` of `now` (unix seconds).
///
/// A token that cannot be decoded counts as expired.
pub fn is_expired_or_close(token: &str, now: i64, window_secs: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp <= now + window_secs,
        Err(e) => {
            tracing::debug!("Treating undecodable access token as expired: {}", e);
            true
        }
    }
}

/// Seconds until the token expires, negative once it has
pub fn expires_in(token: &str, now: i64) -> Option<i64> {
    decode_claims(token).ok().map(|c| c.exp - now)
}

/// Current unix time in seconds
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Build an unsigned token carrying `exp` (test fixtures)
#[cfg(test)]
pub(crate) fn unsigned_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({
            "sub": 1,
            "email": "ana@example.com",
            "nombre": "Ana",
            "apellido": "Ruiz",
            "exp": exp,
            "iat": exp - 900,
        })
        .to_string(),
    );
    format!("{}.{}.signature", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_decode_claims() {
        let claims = decode_claims(&unsigned_token(NOW + 60)).unwrap();
        assert_eq!(claims.exp, NOW + 60);
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.sub, serde_json::json!(1));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let token = unsigned_token(NOW);
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        while parts[1].len() % 4 != 0 {
            parts[1].push('=');
        }
        assert!(decode_claims(&parts.join(".")).is_ok());
    }

    #[test]
    fn test_expiry_window() {
        let window = REFRESH_WINDOW_SECS;
        assert!(!is_expired_or_close(&unsigned_token(NOW + 301), NOW, window));
        assert!(is_expired_or_close(&unsigned_token(NOW + 300), NOW, window));
        assert!(is_expired_or_close(&unsigned_token(NOW + 10), NOW, window));
        assert!(is_expired_or_close(&unsigned_token(NOW - 10), NOW, window));
    }

    #[test]
    fn test_garbage_counts_as_expired() {
        assert!(is_expired_or_close("not-a-jwt", NOW, REFRESH_WINDOW_SECS));
        assert!(is_expired_or_close("a.@@@.c", NOW, REFRESH_WINDOW_SECS));
        assert!(matches!(decode_claims("a.b"), Err(TokenError::Malformed)));
        assert_eq!(expires_in("nope", NOW), None);
        assert_eq!(expires_in(&unsigned_token(NOW + 90), NOW), Some(90));
    }
}
