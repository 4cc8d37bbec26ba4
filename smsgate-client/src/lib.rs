//! Client for the Android SMS Gateway API.
//!
//! Provides:
//! - Blocking ([`ApiClient`]) and async ([`AsyncApiClient`]) clients with
//!   `send` and `get_state`
//! - Pluggable HTTP transports with reqwest-backed defaults
//! - Optional end-to-end encryption of message bodies and phone numbers via
//!   any [`smsgate_crypto::Encryptor`]
//!
//! ```no_run
//! use smsgate_client::{AsyncApiClient, ClientConfig, Message};
//! use smsgate_crypto::AesEncryptor;
//! use std::sync::Arc;
//!
//! # async fn run() -> smsgate_client::ClientResult<()> {
//! let config = ClientConfig::new("login", "password");
//! let client = AsyncApiClient::new(config, Some(Arc::new(AesEncryptor::new("passphrase"))))?;
//! let state = client.send(Message::new("Hello!", ["+15550001111"])).await?;
//! let state = client.get_state(&state.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod api_client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod transport;
pub mod types;

pub use api_client::{ApiClient, AsyncApiClient};
pub use config::ClientConfig;
pub use crypto::MessageCrypto;
pub use error::{ClientError, ClientResult};
pub use types::*;
