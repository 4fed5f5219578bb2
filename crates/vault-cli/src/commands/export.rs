//! Selective export to an unencrypted file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use vault_core::ExportOptions;

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::errors::CliError;
use crate::output::print_unlock_hint;

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let ids = args
        .select
        .iter()
        .map(|value| vault.resolve_id(value))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = vault.unlock(ctx.interactive(args.no_input))?;
    print_unlock_hint(&report, ctx.quiet());

    if args.all {
        if vault.session.select_all()? == 0 {
            return Err(CliError::invalid_input("No readable records to export").into());
        }
    } else {
        for id in ids {
            let Some(record) = vault.session.get(&id) else {
                continue;
            };
            let kind = record.kind();
            if !vault.session.selection().contains(kind, &id) {
                vault.session.toggle_selection(kind, id)?;
            }
        }
    }

    let mut options = ExportOptions::default();
    if let Some(title) = &args.title {
        options.title = title.clone();
    }
    if let Some(width) = args.page_width {
        options.page_width = width;
    }
    if let Some(height) = args.page_height {
        options.page_height = height;
    }

    let artifact = vault
        .session
        .export(args.format, &vault.templates, &options)?;
    let selected = vault.session.selection().len();
    vault.session.lock();

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
    if target == Path::new("-") {
        std::io::stdout()
            .write_all(&artifact.bytes)
            .map_err(|e| anyhow::anyhow!("Failed to write export: {}", e))?;
        return Ok(());
    }

    write_artifact(&target, &artifact.bytes, args.force)?;
    if !ctx.quiet() {
        println!(
            "Exported {} records to {} ({})",
            selected,
            target.display(),
            artifact.media_type
        );
    }
    if artifact.is_plaintext() {
        eprintln!("Warning: {} is NOT encrypted. Store or delete it with care.", target.display());
    }
    Ok(())
}

/// Write the export readable by the current user only.
fn write_artifact(path: &Path, bytes: &[u8], force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "{} already exists\nHint: Pass --force to overwrite it.",
            path.display()
        ))
        .into());
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", path.display(), e))?;
    file.write_all(bytes)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
    Ok(())
}
