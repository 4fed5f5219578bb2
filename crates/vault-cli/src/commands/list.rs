use vault_core::{DecryptedRecord, RecordKind};

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{print_unlock_hint, record_json, records_table, use_color};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let mut vault = ctx.open_vault()?;
    if vault.session.sealed().is_empty() {
        if args.json {
            println!("[]");
        } else if !ctx.quiet() {
            println!("No records yet. Add one with `vault add --body \"...\"`.");
        }
        return Ok(());
    }

    let report = vault.unlock(ctx.interactive(args.no_input))?;
    print_unlock_hint(&report, ctx.quiet());

    let kind: Option<RecordKind> = args.kind.map(Into::into);
    let records: Vec<&DecryptedRecord> = vault
        .session
        .records()
        .iter()
        .filter(|record| kind.map_or(true, |kind| record.kind() == kind))
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if args.json {
        let values: Vec<serde_json::Value> = records.iter().map(|r| record_json(r)).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if records.is_empty() {
        if !ctx.quiet() {
            println!("No matching records.");
        }
    } else {
        println!("{}", records_table(&records, &vault.templates, use_color()));
    }

    vault.session.lock();
    Ok(())
}
