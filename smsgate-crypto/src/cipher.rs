//! AES-256-CBC with PKCS#7 padding.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{DerivedKey, Salt};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Encrypts `plaintext`, padding it to a whole number of blocks.
///
/// The IV is the salt the key was derived with.
pub fn encrypt(key: &DerivedKey, iv: &Salt, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypts and unpads `ciphertext`.
///
/// A wrong key almost always surfaces here as a padding failure.
pub fn decrypt(key: &DerivedKey, iv: &Salt, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::Decryption(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
            ciphertext.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), iv.as_bytes())
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decryption("invalid padding (wrong key or tampered data)".into()))
}

/// Encrypts a UTF-8 string.
pub fn encrypt_string(key: &DerivedKey, iv: &Salt, plaintext: &str) -> CryptoResult<Vec<u8>> {
    encrypt(key, iv, plaintext.as_bytes())
}

/// Decrypts to a UTF-8 string.
pub fn decrypt_string(key: &DerivedKey, iv: &Salt, ciphertext: &[u8]) -> CryptoResult<String> {
    let plaintext = Zeroizing::new(decrypt(key, iv, ciphertext)?);
    String::from_utf8(plaintext.to_vec())
        .map_err(|_| CryptoError::Decryption("plaintext is not valid UTF-8".to_string()))
}
