//! Passphrase-based key derivation.

use crate::error::{CryptoError, CryptoResult};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a derived AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the random salt in bytes. The salt also serves as the CBC IV.
pub const SALT_SIZE: usize = 16;

/// PBKDF2 work factor used for new envelopes.
pub const DEFAULT_ITERATIONS: u32 = 75_000;

/// Random per-encryption salt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Draws a fresh salt from the thread-local CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a salt from a decoded envelope field.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; SALT_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidFormat(format!(
                "salt must be {SALT_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// A 256-bit key derived from a passphrase. Zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derives a key with PBKDF2-HMAC-SHA1.
///
/// Deterministic for a given `(passphrase, salt, iterations)`, which is what
/// lets `decrypt` rebuild the key from the envelope alone.
#[cfg(feature = "aes-cbc")]
pub fn derive_key(passphrase: &str, salt: &Salt, iterations: u32) -> DerivedKey {
    let mut out = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<sha1::Sha1>(passphrase.as_bytes(), salt.as_bytes(), iterations, &mut out);
    let key = DerivedKey(out);
    out.zeroize();
    key
}
