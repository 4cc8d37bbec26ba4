//! Encryption of outgoing messages and decryption of incoming states.
//!
//! Runs entirely before a request is issued or after a response is parsed,
//! never in between, so a cancelled request cannot leave a message
//! half-transformed.

use crate::error::{ClientError, ClientResult};
use crate::types::{Message, MessageState, RecipientState};
use smsgate_crypto::Encryptor;
use std::sync::Arc;
use tracing::debug;

/// Applies the optional encryptor to message payloads.
#[derive(Clone, Default)]
pub struct MessageCrypto {
    encryptor: Option<Arc<dyn Encryptor>>,
}

impl MessageCrypto {
    pub fn new(encryptor: Option<Arc<dyn Encryptor>>) -> Self {
        Self { encryptor }
    }

    pub fn is_enabled(&self) -> bool {
        self.encryptor.is_some()
    }

    /// Encrypts the body and every phone number.
    ///
    /// A message already flagged as encrypted is rejected even when no
    /// encryptor is configured.
    pub fn prepare_outgoing(&self, message: Message) -> ClientResult<Message> {
        if message.is_encrypted {
            return Err(ClientError::AlreadyEncrypted);
        }

        let Some(encryptor) = &self.encryptor else {
            return Ok(message);
        };

        let body = encryptor.encrypt(&message.message)?;
        let phone_numbers = message
            .phone_numbers
            .iter()
            .map(|phone| encryptor.encrypt(phone))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("encrypted message body and {} recipient(s)", phone_numbers.len());

        Ok(Message {
            message: body,
            phone_numbers,
            ..message
        }
        .with_encrypted(true))
    }

    /// Decrypts recipient phone numbers of a state flagged as encrypted.
    ///
    /// Only `phone_number` is rewritten; states and errors pass through.
    pub fn process_incoming(&self, state: MessageState) -> ClientResult<MessageState> {
        if !state.is_encrypted {
            return Ok(state);
        }

        let encryptor = self.encryptor.as_ref().ok_or(ClientError::MissingEncryptor)?;

        let recipients = state
            .recipients
            .iter()
            .map(|r| {
                Ok(RecipientState {
                    phone_number: encryptor.decrypt(&r.phone_number)?,
                    ..r.clone()
                })
            })
            .collect::<ClientResult<Vec<_>>>()?;

        debug!("decrypted {} recipient(s) of message {}", recipients.len(), state.id);

        Ok(MessageState {
            recipients,
            ..state
        }
        .with_encrypted(false))
    }
}

impl std::fmt::Debug for MessageCrypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCrypto")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
