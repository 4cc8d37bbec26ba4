//! HTTP transports.
//!
//! The API clients only need JSON `GET` and `POST`. Both calling conventions
//! are traits so callers can plug in their own stack; the reqwest-backed
//! implementations are the defaults.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Blocking JSON transport.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str, headers: &HeaderMap) -> ClientResult<Value>;

    fn post(&self, url: &str, body: &Value, headers: &HeaderMap) -> ClientResult<Value>;
}

/// Non-blocking JSON transport.
#[async_trait]
pub trait AsyncHttpTransport: Send + Sync {
    async fn get(&self, url: &str, headers: &HeaderMap) -> ClientResult<Value>;

    async fn post(&self, url: &str, body: &Value, headers: &HeaderMap) -> ClientResult<Value>;
}

/// Async transport over a pooled `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client (shared pool, custom TLS, proxies).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn into_json(resp: reqwest::Response) -> ClientResult<Value> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("gateway responded {status}");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl AsyncHttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &HeaderMap) -> ClientResult<Value> {
        let resp = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await?;
        Self::into_json(resp).await
    }

    async fn post(&self, url: &str, body: &Value, headers: &HeaderMap) -> ClientResult<Value> {
        let resp = self
            .client
            .post(url)
            .headers(headers.clone())
            .json(body)
            .send()
            .await?;
        Self::into_json(resp).await
    }
}

/// Blocking transport over `reqwest::blocking::Client`.
///
/// Must not be used from inside an async runtime.
#[derive(Clone, Debug)]
pub struct BlockingReqwestTransport {
    client: reqwest::blocking::Client,
}

impl BlockingReqwestTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    fn into_json(resp: reqwest::blocking::Response) -> ClientResult<Value> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!("gateway responded {status}");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json()?)
    }
}

impl HttpTransport for BlockingReqwestTransport {
    fn get(&self, url: &str, headers: &HeaderMap) -> ClientResult<Value> {
        let resp = self.client.get(url).headers(headers.clone()).send()?;
        Self::into_json(resp)
    }

    fn post(&self, url: &str, body: &Value, headers: &HeaderMap) -> ClientResult<Value> {
        let resp = self
            .client
            .post(url)
            .headers(headers.clone())
            .json(body)
            .send()?;
        Self::into_json(resp)
    }
}
