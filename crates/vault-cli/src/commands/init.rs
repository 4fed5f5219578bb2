use std::path::PathBuf;

use uuid::Uuid;
use vault_core::storage::SqliteRecordStore;
use vault_core::OwnerId;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, read_config, write_config, VaultConfig};
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path(ctx.cli())?;
    let existing = if config_path.exists() {
        if !args.force {
            return Err(CliError::invalid_input(format!(
                "Config already exists at {}\nHint: Pass --force to rewrite it.",
                config_path.display()
            ))
            .into());
        }
        Some(read_config(&config_path)?)
    } else {
        None
    };

    // Rewriting keeps the owner and store so existing records stay readable.
    let owner_id = match (&args.owner, &existing) {
        (Some(owner), _) => owner.clone(),
        (None, Some(config)) => config.vault.owner_id.clone(),
        (None, None) => Uuid::new_v4().to_string(),
    };
    OwnerId::new(owner_id.clone()).map_err(|e| CliError::invalid_input(e.to_string()))?;

    let store_path = match (&args.store, &existing) {
        (Some(path), _) => path.clone(),
        (None, Some(config)) => PathBuf::from(&config.vault.store_path),
        (None, None) => default_store_path()?,
    };
    if let Some(parent) = store_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create store directory {}: {}", parent.display(), e)
            })?;
        }
    }
    SqliteRecordStore::open(&store_path)?;

    let mut config = VaultConfig::new(owner_id, store_path.clone());
    if let Some(previous) = existing {
        config.kdf = previous.kdf;
        config.templates = previous.templates;
    }
    write_config(&config_path, &config)?;
    tracing::info!(config = %config_path.display(), "initialized vault");

    if !ctx.quiet() {
        println!("Initialized vault");
        println!("  Config: {}", config_path.display());
        println!("  Store:  {}", store_path.display());
        println!("\nThe passphrase is chosen when you add the first record:");
        println!("  vault add --body \"Hello\"");
    }
    Ok(())
}
