//! Passphrase acquisition.
//!
//! The passphrase comes from `VAULT_PASSPHRASE` or an interactive prompt. It
//! is held as a [`SecretString`] and never written anywhere.

use dialoguer::Password;
use secrecy::SecretString;
use vault_core::crypto::validate_new_passphrase;

use crate::errors::CliError;

const PASSPHRASE_ENV: &str = "VAULT_PASSPHRASE";

fn env_passphrase() -> Option<SecretString> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Whether the passphrase is supplied non-interactively.
pub fn passphrase_from_env() -> bool {
    env_passphrase().is_some()
}

/// Read the passphrase for an existing vault.
pub fn read_passphrase(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(passphrase) = env_passphrase() {
        return Ok(passphrase);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ))
        .into());
    }
    let value = Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
    Ok(SecretString::from(value))
}

/// Read and confirm the passphrase that will seal the first record.
pub fn read_new_passphrase(interactive: bool) -> anyhow::Result<SecretString> {
    let value = if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
        value
    } else if interactive {
        Password::new()
            .with_prompt("Choose a passphrase")
            .with_confirmation("Confirm passphrase", "Passphrases do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?
    } else {
        return Err(CliError::invalid_input(format!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ))
        .into());
    };

    validate_new_passphrase(&value).map_err(|e| CliError::invalid_input(e.to_string()))?;
    Ok(SecretString::from(value))
}
