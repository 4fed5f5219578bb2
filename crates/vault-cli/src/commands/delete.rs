use dialoguer::Confirm;

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::CliError;

/// Deleting needs no passphrase: the store removes ciphertext by id.
pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let id = vault.resolve_id(&args.id)?;

    if !args.yes {
        if !ctx.interactive(false) {
            return Err(CliError::invalid_input(
                "Refusing to delete without confirmation. Pass --yes.",
            )
            .into());
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete record {}? This cannot be undone", id))
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            if !ctx.quiet() {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    vault.session.delete(&mut vault.store, &id)?;
    if !ctx.quiet() {
        println!("Deleted record {}", id);
    }
    Ok(())
}
