//! API clients for the SMS gateway.
//!
//! [`AsyncApiClient`] and the blocking [`ApiClient`] expose the same two
//! calls, `send` and `get_state`, over a pluggable transport. Both share
//! [`ClientCore`] for URL building, auth headers and payload encryption.
//!
//! The two are separate types rather than one trait: the async client is
//! generic over [`AsyncHttpTransport`], the blocking one over
//! [`HttpTransport`], and their method signatures differ only in `async`.
//! Pick whichever matches the caller's runtime.

use crate::config::ClientConfig;
use crate::crypto::MessageCrypto;
use crate::error::{ClientError, ClientResult};
use crate::transport::{
    AsyncHttpTransport, BlockingReqwestTransport, HttpTransport, ReqwestTransport,
};
use crate::types::{Message, MessageState};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Url;
use smsgate_crypto::Encryptor;
use std::sync::Arc;
use tracing::debug;

/// `User-Agent` sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!(
    "android-sms-gateway/",
    env!("CARGO_PKG_VERSION"),
    " (client; rust)"
);

/// Transport-independent half of the clients.
#[derive(Debug)]
pub struct ClientCore {
    base_url: Url,
    headers: HeaderMap,
    crypto: MessageCrypto,
}

impl ClientCore {
    pub fn new(config: &ClientConfig, encryptor: Option<Arc<dyn Encryptor>>) -> ClientResult<Self> {
        config.validate()?;
        let base_url = Url::parse(config.base_url())
            .map_err(|e| ClientError::Config(format!("invalid base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base_url '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self {
            base_url,
            headers: build_headers(&config.login, &config.password)?,
            crypto: MessageCrypto::new(encryptor),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn crypto(&self) -> &MessageCrypto {
        &self.crypto
    }

    fn message_url(&self) -> String {
        self.endpoint(&["message"])
    }

    fn state_url(&self, id: &str) -> String {
        self.endpoint(&["message", id])
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        // Always Ok: `new` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    /// Encrypts (if configured) and serializes an outgoing message.
    fn outgoing_payload(&self, message: Message) -> ClientResult<serde_json::Value> {
        let message = self.crypto.prepare_outgoing(message)?;
        Ok(serde_json::to_value(&message)?)
    }

    /// Parses a state payload and decrypts it (if flagged).
    fn incoming_state(&self, payload: serde_json::Value) -> ClientResult<MessageState> {
        let state: MessageState = serde_json::from_value(payload)?;
        self.crypto.process_incoming(state)
    }
}

fn build_headers(login: &str, password: &str) -> ClientResult<HeaderMap> {
    let credentials = STANDARD.encode(format!("{login}:{password}"));
    let mut auth = HeaderValue::from_str(&format!("Basic {credentials}"))
        .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    Ok(headers)
}

/// Non-blocking gateway client.
pub struct AsyncApiClient<T = ReqwestTransport> {
    core: ClientCore,
    http: T,
}

impl AsyncApiClient<ReqwestTransport> {
    /// Builds a client on the default reqwest transport.
    pub fn new(config: ClientConfig, encryptor: Option<Arc<dyn Encryptor>>) -> ClientResult<Self> {
        let http = ReqwestTransport::new(&config)?;
        Self::with_transport(config, encryptor, http)
    }
}

impl<T: AsyncHttpTransport> AsyncApiClient<T> {
    pub fn with_transport(
        config: ClientConfig,
        encryptor: Option<Arc<dyn Encryptor>>,
        http: T,
    ) -> ClientResult<Self> {
        Ok(Self {
            core: ClientCore::new(&config, encryptor)?,
            http,
        })
    }

    pub fn core(&self) -> &ClientCore {
        &self.core
    }

    /// Submits a message and returns its initial state.
    pub async fn send(&self, message: Message) -> ClientResult<MessageState> {
        let payload = self.core.outgoing_payload(message)?;
        let url = self.core.message_url();
        debug!("POST {url}");
        let resp = self.http.post(&url, &payload, self.core.headers()).await?;
        self.core.incoming_state(resp)
    }

    /// Fetches the current state of a previously sent message.
    pub async fn get_state(&self, id: &str) -> ClientResult<MessageState> {
        let url = self.core.state_url(id);
        debug!("GET {url}");
        let resp = self.http.get(&url, self.core.headers()).await?;
        self.core.incoming_state(resp)
    }
}

/// Blocking gateway client.
pub struct ApiClient<T = BlockingReqwestTransport> {
    core: ClientCore,
    http: T,
}

impl ApiClient<BlockingReqwestTransport> {
    /// Builds a client on the default blocking reqwest transport.
    pub fn new(config: ClientConfig, encryptor: Option<Arc<dyn Encryptor>>) -> ClientResult<Self> {
        let http = BlockingReqwestTransport::new(&config)?;
        Self::with_transport(config, encryptor, http)
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn with_transport(
        config: ClientConfig,
        encryptor: Option<Arc<dyn Encryptor>>,
        http: T,
    ) -> ClientResult<Self> {
        Ok(Self {
            core: ClientCore::new(&config, encryptor)?,
            http,
        })
    }

    pub fn core(&self) -> &ClientCore {
        &self.core
    }

    pub fn send(&self, message: Message) -> ClientResult<MessageState> {
        let payload = self.core.outgoing_payload(message)?;
        let url = self.core.message_url();
        debug!("POST {url}");
        let resp = self.http.post(&url, &payload, self.core.headers())?;
        self.core.incoming_state(resp)
    }

    pub fn get_state(&self, id: &str) -> ClientResult<MessageState> {
        let url = self.core.state_url(id);
        debug!("GET {url}");
        let resp = self.http.get(&url, self.core.headers())?;
        self.core.incoming_state(resp)
    }
}
