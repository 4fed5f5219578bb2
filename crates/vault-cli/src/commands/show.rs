use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::errors::CliError;
use crate::output::{print_record, print_unlock_hint, record_json, use_color};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    let id = vault.resolve_id(&args.id)?;

    let report = vault.unlock(ctx.interactive(args.no_input))?;
    print_unlock_hint(&report, true);

    let record = vault
        .session
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Record {} vanished while unlocking", id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record_json(record))?);
    } else {
        print_record(record, &vault.templates, ctx.quiet(), use_color());
    }

    if record.decryption_failed() {
        return Err(CliError::auth_failed(
            format!("Record {} could not be decrypted", id),
            "Hint: Check your passphrase or VAULT_PASSPHRASE.",
        )
        .into());
    }
    vault.session.lock();
    Ok(())
}
