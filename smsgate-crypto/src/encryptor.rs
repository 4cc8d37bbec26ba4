//! Passphrase encryptor for message fields.
//!
//! [`Encryptor`] is the capability the client depends on. [`AesEncryptor`]
//! is the only backend, compiled in with the `aes-cbc` feature.

use crate::error::CryptoResult;
use std::sync::Arc;

#[cfg(feature = "aes-cbc")]
use crate::{
    cipher,
    envelope::Envelope,
    error::CryptoError,
    key::{derive_key, Salt, DEFAULT_ITERATIONS},
};
#[cfg(feature = "aes-cbc")]
use zeroize::Zeroizing;

/// Encrypts cleartext into a self-describing envelope string and back.
///
/// Implementations hold no mutable state, so a single instance can be shared
/// across threads and tasks.
pub trait Encryptor: Send + Sync {
    fn encrypt(&self, cleartext: &str) -> CryptoResult<String>;

    /// Decrypts an envelope. Everything but the passphrase comes from the
    /// envelope itself.
    fn decrypt(&self, envelope: &str) -> CryptoResult<String>;
}

/// AES-256-CBC encryptor keyed by PBKDF2-HMAC-SHA1 over a passphrase.
///
/// Each call draws a fresh 16-byte salt that is also used as the CBC IV.
/// Envelopes written with this layout are already in circulation, so the
/// salt/IV coupling is part of the format.
#[cfg(feature = "aes-cbc")]
#[derive(Clone)]
pub struct AesEncryptor {
    passphrase: Zeroizing<String>,
    iterations: u32,
}

#[cfg(feature = "aes-cbc")]
impl AesEncryptor {
    /// Creates an encryptor with [`DEFAULT_ITERATIONS`].
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Creates an encryptor with a custom PBKDF2 work factor for new envelopes.
    pub fn with_iterations(passphrase: impl Into<String>, iterations: u32) -> CryptoResult<Self> {
        if iterations == 0 {
            return Err(CryptoError::InvalidParameter(
                "iteration count must be positive".to_string(),
            ));
        }
        Ok(Self {
            passphrase: Zeroizing::new(passphrase.into()),
            iterations,
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

#[cfg(feature = "aes-cbc")]
impl std::fmt::Debug for AesEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesEncryptor")
            .field("passphrase", &"[REDACTED]")
            .field("iterations", &self.iterations)
            .finish()
    }
}

#[cfg(feature = "aes-cbc")]
impl Encryptor for AesEncryptor {
    fn encrypt(&self, cleartext: &str) -> CryptoResult<String> {
        let salt = Salt::random();
        let key = derive_key(&self.passphrase, &salt, self.iterations);
        let ciphertext = cipher::encrypt_string(&key, &salt, cleartext)?;

        Ok(Envelope::new(self.iterations, salt, ciphertext).to_string())
    }

    fn decrypt(&self, envelope: &str) -> CryptoResult<String> {
        let envelope = Envelope::parse(envelope)?;
        // The envelope's own count, not ours: older envelopes may predate a
        // change of default.
        let key = derive_key(&self.passphrase, envelope.salt(), envelope.iterations());
        cipher::decrypt_string(&key, envelope.salt(), envelope.ciphertext())
    }
}

/// Builds the encryptor compiled into this crate.
///
/// Fails with [`CryptoError::EncryptorUnavailable`](crate::CryptoError::EncryptorUnavailable)
/// when built without the `aes-cbc` feature.
#[cfg(feature = "aes-cbc")]
pub fn default_encryptor(passphrase: &str, iterations: u32) -> CryptoResult<Arc<dyn Encryptor>> {
    Ok(Arc::new(AesEncryptor::with_iterations(passphrase, iterations)?))
}

#[cfg(not(feature = "aes-cbc"))]
pub fn default_encryptor(_passphrase: &str, _iterations: u32) -> CryptoResult<Arc<dyn Encryptor>> {
    Err(crate::error::CryptoError::EncryptorUnavailable)
}
