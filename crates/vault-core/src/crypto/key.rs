//! Key derivation using Argon2id.
//!
//! The vault key is derived from the passphrase and the owner identifier.
//! Derivation is deterministic, so "unlocking" means deriving again rather
//! than fetching anything from storage.

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::crypto::passphrase::validate_passphrase;
use crate::error::{Result, VaultError};

/// Default Argon2id parameters.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
const DEFAULT_ITERATIONS: u32 = 3;
const DEFAULT_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (256 bits for XChaCha20-Poly1305).
pub const KEY_LENGTH: usize = 32;

/// blake3 context string used to turn an owner identifier into an Argon2 salt.
const SALT_CONTEXT: &str = "journal-vault 2024-06 argon2id owner salt v1";

/// Argon2id cost parameters.
///
/// These are fixed when a session is created and never negotiated per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl KdfParams {
    /// Build and validate a parameter set.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Crypto` if Argon2 rejects the combination
    /// (e.g. memory below 8 KiB per lane).
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        params.to_argon2()?;
        Ok(params)
    }

    fn to_argon2(self) -> Result<argon2::Params> {
        argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| VaultError::Crypto(format!("Invalid Argon2 params: {}", e)))
    }
}

/// Symmetric key held by an unlocked session.
///
/// Zeroized when dropped. It cannot be cloned, serialized or displayed, so
/// the only way it leaves a session is by being dropped.
#[derive(ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_LENGTH],
}

impl VaultKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes, for immediate use by the codec only.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the vault key for `owner_id` from `passphrase`.
///
/// The owner identifier is hashed into a 32-byte salt with blake3 in
/// key-derivation mode, so short identifiers still meet Argon2's minimum
/// salt length and two users with the same passphrase get different keys.
///
/// This function cannot tell a wrong passphrase from a right one. A wrong
/// passphrase shows up later as records that fail to authenticate.
///
/// # Errors
///
/// - `VaultError::InvalidPassphrase` if the passphrase is empty or whitespace
/// - `VaultError::InvalidInput` if the owner identifier is empty
/// - `VaultError::Crypto` if Argon2 fails
///
/// # Examples
///
/// ```
/// use vault_core::crypto::{derive_key, KdfParams};
///
/// let params = KdfParams::new(8, 1, 1).unwrap();
/// let key = derive_key("correct-horse", "u1", &params).unwrap();
/// assert!(format!("{:?}", key).contains("REDACTED"));
/// ```
pub fn derive_key(passphrase: &str, owner_id: &str, params: &KdfParams) -> Result<VaultKey> {
    validate_passphrase(passphrase)?;

    if owner_id.is_empty() {
        return Err(VaultError::InvalidInput(
            "Owner id cannot be empty".to_string(),
        ));
    }

    let salt = blake3::derive_key(SALT_CONTEXT, owner_id.as_bytes());
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params.to_argon2()?,
    );

    let mut key_bytes = Zeroizing::new([0u8; KEY_LENGTH]);
    argon2
        .hash_password_into(passphrase.as_bytes(), &salt, &mut key_bytes[..])
        .map_err(|e| VaultError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(VaultKey::from_bytes(*key_bytes))
}
