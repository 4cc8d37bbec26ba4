//! Client error types.

use smsgate_crypto::CryptoError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when sending messages or fetching their state.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("message is already encrypted")]
    AlreadyEncrypted,

    #[error("message is encrypted but no encryptor is configured")]
    MissingEncryptor,

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of a rejected request, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
