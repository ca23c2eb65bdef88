//! Client Error Types
//!
//! Errors raised while talking to the energy API. Page views never see
//! these directly: they are logged and turned into `None` or a message.

use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur when calling the energy API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or connection failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was not the JSON shape we expected
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Reading or writing the stored session failed
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// HTTP status of the failure, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for a form error banner
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
