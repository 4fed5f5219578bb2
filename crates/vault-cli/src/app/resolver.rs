//! Path resolution for the config file.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::default_config_path;

/// Resolve the config path: `--config` / `VAULT_CONFIG`, then the XDG default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.config.as_ref() {
        if !path.as_os_str().is_empty() {
            return Ok(path.clone());
        }
    }
    default_config_path()
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "No vault config found at {}\n\nRun:\n  vault init\n\nOr point at an existing config:\n  VAULT_CONFIG=/path/to/config.toml vault list",
        config_path.display()
    )
}
