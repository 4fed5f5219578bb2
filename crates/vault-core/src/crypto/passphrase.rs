//! Passphrase validation.

use crate::error::{Result, VaultError};

/// Minimum length enforced when a passphrase is first chosen.
const MIN_NEW_PASSPHRASE_LENGTH: usize = 8;

/// Reject passphrases that cannot be used to derive a key.
///
/// Only emptiness is checked here. Unlocking must accept whatever the user
/// originally chose.
///
/// # Examples
///
/// ```
/// use vault_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("correct-horse").is_ok());
/// assert!(validate_passphrase("   ").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(VaultError::InvalidPassphrase(
            "Passphrase cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a passphrase that is being chosen for a new vault.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At least 8 characters long
pub fn validate_new_passphrase(passphrase: &str) -> Result<()> {
    validate_passphrase(passphrase)?;

    let length = passphrase.chars().count();
    if length < MIN_NEW_PASSPHRASE_LENGTH {
        return Err(VaultError::InvalidPassphrase(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_NEW_PASSPHRASE_LENGTH, length
        )));
    }

    Ok(())
}
