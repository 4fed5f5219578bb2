//! Application context for the vault CLI.
//!
//! Bundles the parsed arguments with config loading and opens the record
//! store plus a [`VaultSession`] for the configured owner.

use std::io::IsTerminal;
use std::path::Path;

use secrecy::ExposeSecret;
use vault_core::storage::SqliteRecordStore;
use vault_core::{OwnerId, RecordId, StaticTemplates, UnlockReport, VaultSession};

use crate::cli::Cli;
use crate::config::{read_config, VaultConfig};
use crate::constants::MAX_PASSPHRASE_ATTEMPTS;
use crate::errors::CliError;

use super::passphrase::{passphrase_from_env, read_new_passphrase, read_passphrase};
use super::resolver::{missing_config_message, resolve_config_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self, no_input: bool) -> bool {
        std::io::stdin().is_terminal() && !no_input
    }

    pub fn load_config(&self) -> anyhow::Result<VaultConfig> {
        let path = resolve_config_path(self.cli)?;
        if !path.exists() {
            return Err(CliError::not_found(
                missing_config_message(&path),
                "Hint: `vault init` writes a config and creates the record store.",
            )
            .into());
        }
        read_config(&path)
    }

    /// Open the store and a locked session holding this owner's records.
    pub fn open_vault(&self) -> anyhow::Result<OpenVault> {
        let config = self.load_config()?;
        let store_path = Path::new(&config.vault.store_path);
        if !store_path.exists() {
            return Err(CliError::not_found(
                format!("No record store found at {}", store_path.display()),
                "Hint: Run `vault init --force` to create it.",
            )
            .into());
        }

        let store = SqliteRecordStore::open(store_path)?;
        let owner_id = OwnerId::new(config.vault.owner_id.clone())?;
        let mut session = VaultSession::new(owner_id, config.kdf_params()?);
        session.refresh(&store)?;
        tracing::debug!(records = session.sealed().len(), "opened record store");

        Ok(OpenVault {
            templates: config.template_source(),
            store,
            session,
        })
    }
}

/// Store, session and templates for one command invocation.
pub struct OpenVault {
    pub store: SqliteRecordStore,
    pub session: VaultSession,
    pub templates: StaticTemplates,
}

impl OpenVault {
    /// Unlock for reading.
    ///
    /// A passphrase that opens nothing is re-prompted when typed
    /// interactively; otherwise the report is returned for the caller to
    /// turn into a hint.
    pub fn unlock(&mut self, interactive: bool) -> anyhow::Result<UnlockReport> {
        let retry = interactive && !passphrase_from_env();
        let mut attempt = 1;
        loop {
            let passphrase = read_passphrase(interactive)?;
            let report = self.session.unlock(passphrase.expose_secret())?;
            if !report.all_failed() || !retry || attempt >= MAX_PASSPHRASE_ATTEMPTS {
                return Ok(report);
            }
            eprintln!("No records could be decrypted with that passphrase. Try again.");
            self.session.lock();
            attempt += 1;
        }
    }

    /// Unlock before sealing a new record.
    ///
    /// An empty vault asks for a new passphrase with confirmation. A
    /// non-empty vault refuses to write when the passphrase opens none of
    /// the existing records, since the new record would be sealed under a
    /// different key.
    pub fn unlock_for_write(&mut self, interactive: bool) -> anyhow::Result<UnlockReport> {
        if self.session.sealed().is_empty() {
            let passphrase = read_new_passphrase(interactive)?;
            return Ok(self.session.unlock(passphrase.expose_secret())?);
        }

        let report = self.unlock(interactive)?;
        if report.all_failed() {
            return Err(CliError::auth_failed(
                "The passphrase did not open any existing record; nothing was written.",
                "Hint: Check your passphrase or VAULT_PASSPHRASE.",
            )
            .into());
        }
        Ok(report)
    }

    /// Resolve a full id or unique prefix against the loaded records.
    pub fn resolve_id(&self, value: &str) -> anyhow::Result<RecordId> {
        let needle = value.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(CliError::invalid_input("Record id must not be empty").into());
        }

        let matches: Vec<RecordId> = self
            .session
            .sealed()
            .iter()
            .map(|record| record.id)
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(CliError::not_found(
                format!("Record {} not found", value),
                "Hint: Run `vault list` to see record ids.",
            )
            .into()),
            _ => Err(CliError::invalid_input(format!(
                "Record id prefix {} is ambiguous ({} matches); use more characters",
                value,
                matches.len()
            ))
            .into()),
        }
    }
}
