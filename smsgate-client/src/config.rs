//! Client configuration.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};

/// Public cloud endpoint of the SMS gateway.
pub const DEFAULT_BASE_URL: &str = "https://api.sms-gate.app/3rdparty/v1";

/// Configuration for an API client.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the gateway API, without trailing slash.
    pub base_url: String,

    /// Basic-auth login.
    pub login: String,

    /// Basic-auth password.
    pub password: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login: String::new(),
            password: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Overrides the base URL (e.g. a private server or a local device).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url().is_empty() {
            return Err(ClientError::Config("base_url must not be empty".to_string()));
        }
        if self.login.is_empty() {
            return Err(ClientError::Config("login must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
