//! Vault CLI - an encrypted personal journal and self-assessment log
//!
//! This is the command-line host for `vault-core`: it supplies the owner id,
//! the record store and the assessment templates, and turns the vault's
//! operations into commands.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vault_core::{VaultError, VERSION};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{add, delete, export, init, list, misc, show, templates};
use crate::errors::{classify, CliError};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        if let Some(cli_error) = e.downcast_ref::<CliError>() {
            cli_error.exit();
        }
        if let Some(cli_error) = e.downcast_ref::<VaultError>().and_then(classify) {
            cli_error.exit();
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args)?,
        Some(Commands::Add(args)) => add::handle_add(ctx, args)?,
        Some(Commands::List(args)) => list::handle_list(ctx, args)?,
        Some(Commands::Show(args)) => show::handle_show(ctx, args)?,
        Some(Commands::Delete(args)) => delete::handle_delete(ctx, args)?,
        Some(Commands::Export(args)) => export::handle_export(ctx, args)?,
        Some(Commands::Templates(args)) => templates::handle_templates(ctx, args)?,
        Some(Commands::Completions(args)) => misc::handle_completions(args)?,
        None => {
            println!("Vault v{}", VERSION);
            println!("\nQuickstart:");
            println!("  vault init");
            println!("  vault add --body \"Today was hard\"");
            println!("  vault add --template daily-checkin --answer mood=3");
            println!("  vault list");
            println!("  vault export --select <id> --format document");
            println!("\nRun `vault --help` for full usage.");
        }
    }

    Ok(())
}
