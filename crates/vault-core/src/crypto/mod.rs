//! Cryptographic operations for the vault.
//!
//! This module provides key derivation and record encryption using
//! well-audited libraries:
//! - **Argon2id**: Memory-hard key derivation function
//! - **XChaCha20-Poly1305**: Authenticated encryption with 192-bit random nonces
//!
//! ## Security Model
//!
//! - The key is re-derived from the passphrase on every unlock; it is never stored
//! - The owner identifier salts the derivation so equal passphrases never share a key
//! - Every record gets a fresh random nonce at encryption time
//! - Key material and decrypted bytes are zeroized from memory on drop
//!
//! ## Threat Model
//!
//! We defend against:
//! - A record store operator reading or silently altering journal content
//! - Offline brute-force attacks on the passphrase
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod codec;
pub mod key;
pub mod passphrase;

pub use codec::{decrypt, encrypt, CodecError, NONCE_LENGTH};
pub use key::{derive_key, KdfParams, VaultKey, KEY_LENGTH};
pub use passphrase::{validate_new_passphrase, validate_passphrase};
