//! End-to-end encryption for SMS gateway messages.
//!
//! Message bodies and phone numbers are encrypted on the client before they
//! leave the process, using:
//! - PBKDF2-HMAC-SHA1 to derive a 256-bit key from a shared passphrase
//! - AES-256-CBC with PKCS#7 padding
//! - A self-describing `$`-delimited text envelope carrying the algorithm,
//!   iteration count, salt and ciphertext
//!
//! # Envelope
//!
//! ```text
//! $aes-256-cbc/pbkdf2-sha1$i=75000$<salt-base64>$<ciphertext-base64>
//! ```
//!
//! The envelope records the iteration count, so decryption only needs the
//! passphrase. Raising the default work factor never strands old data.
//!
//! # Backends
//!
//! The AES backend sits behind the default `aes-cbc` feature. Without it,
//! [`default_encryptor`] fails with [`CryptoError::EncryptorUnavailable`].

#[cfg(feature = "aes-cbc")]
pub mod cipher;
pub mod encryptor;
pub mod envelope;
mod error;
mod key;

#[cfg(feature = "aes-cbc")]
pub use encryptor::AesEncryptor;
pub use encryptor::{default_encryptor, Encryptor};
pub use envelope::{Envelope, ALGORITHM_ID};
pub use error::{CryptoError, CryptoResult};
#[cfg(feature = "aes-cbc")]
pub use key::derive_key;
pub use key::{DerivedKey, Salt, DEFAULT_ITERATIONS, KEY_SIZE, SALT_SIZE};
