//! Record codec: XChaCha20-Poly1305 authenticated encryption.
//!
//! The codec is content-agnostic. It turns bytes into `(ciphertext, nonce)`
//! and back; interpreting the plaintext is the session's job.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::key::VaultKey;

/// XChaCha20-Poly1305 nonce length in bytes.
pub const NONCE_LENGTH: usize = 24;

/// Errors produced by the record codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Wrong key, tampered ciphertext or tampered nonce
    #[error("authentication failed")]
    Authentication,

    /// Stored nonce does not have the expected length
    #[error("nonce must be {expected} bytes (got {actual})")]
    MalformedNonce { expected: usize, actual: usize },

    /// The OS random source could not produce a nonce
    #[error("random nonce generation failed: {0}")]
    Rng(String),

    /// The cipher refused to encrypt (plaintext too large)
    #[error("encryption failed")]
    Encryption,
}

/// Encrypt `plaintext` under `key` with a freshly generated random nonce.
///
/// Returns the ciphertext (with the 16-byte tag appended) and the nonce that
/// must be stored beside it. Callers cannot supply their own nonce.
pub fn encrypt(plaintext: &[u8], key: &VaultKey) -> Result<(Vec<u8>, Vec<u8>), CodecError> {
    let mut nonce = [0u8; NONCE_LENGTH];
    getrandom::getrandom(&mut nonce).map_err(|e| CodecError::Rng(e.to_string()))?;

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| CodecError::Encryption)?;

    Ok((ciphertext, nonce.to_vec()))
}

/// Decrypt and authenticate `ciphertext` with `nonce` under `key`.
///
/// Pure: the same inputs always produce the same plaintext or the same error.
/// A wrong key never yields a different plausible plaintext; it yields
/// `CodecError::Authentication`.
pub fn decrypt(
    ciphertext: &[u8],
    nonce: &[u8],
    key: &VaultKey,
) -> Result<Zeroizing<Vec<u8>>, CodecError> {
    if nonce.len() != NONCE_LENGTH {
        return Err(CodecError::MalformedNonce {
            expected: NONCE_LENGTH,
            actual: nonce.len(),
        });
    }

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| CodecError::Authentication)
}
