//! Message and delivery-state types exchanged with the gateway.
//!
//! Field names are snake_case in Rust and camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Processing state of a message or of a single recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessState {
    Pending,
    Processed,
    Sent,
    Delivered,
    Failed,
}

/// An outgoing text message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message body.
    pub message: String,
    pub phone_numbers: Vec<String>,
    #[serde(default = "default_true")]
    pub with_delivery_report: bool,
    /// Set only by the encryption step. Body and phone numbers are envelopes
    /// when this is true.
    #[serde(default)]
    pub is_encrypted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Time-to-live in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// 1-based SIM slot on the sending device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim_number: Option<u8>,
}

fn default_true() -> bool {
    true
}

impl Message {
    pub fn new<I, S>(message: impl Into<String>, phone_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            phone_numbers: phone_numbers.into_iter().map(Into::into).collect(),
            with_delivery_report: true,
            is_encrypted: false,
            id: None,
            ttl: None,
            sim_number: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_sim_number(mut self, sim_number: u8) -> Self {
        self.sim_number = Some(sim_number);
        self
    }

    pub fn with_delivery_report(mut self, enabled: bool) -> Self {
        self.with_delivery_report = enabled;
        self
    }

    pub fn with_encrypted(mut self, is_encrypted: bool) -> Self {
        self.is_encrypted = is_encrypted;
        self
    }
}

/// Delivery state for one recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientState {
    pub phone_number: String,
    pub state: ProcessState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Delivery state of a message as reported by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageState {
    pub id: String,
    pub state: ProcessState,
    pub recipients: Vec<RecipientState>,
    /// Older servers omit this flag.
    #[serde(default)]
    pub is_hashed: bool,
    /// Older servers omit this flag.
    #[serde(default)]
    pub is_encrypted: bool,
}

impl MessageState {
    pub fn with_encrypted(mut self, is_encrypted: bool) -> Self {
        self.is_encrypted = is_encrypted;
        self
    }
}

/// Maps a snake_case field name to its camelCase wire name.
pub fn snake_to_camel(name: &str) -> String {
    let mut parts = name.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}
