use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use vault_core::{ExportFormat, RecordKind, VERSION};

/// Vault - an encrypted personal journal and self-assessment log
#[derive(Parser)]
#[command(name = "vault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "VAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a config file and an empty record store
    Init(InitArgs),

    /// Add a journal entry or an assessment response
    Add(AddArgs),

    /// List records, newest first
    List(ListArgs),

    /// Show a single record
    Show(ShowArgs),

    /// Delete a record from the store
    Delete(DeleteArgs),

    /// Export selected records as an unencrypted file
    Export(ExportArgs),

    /// List configured assessment templates
    Templates(TemplatesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Where the record store will be created
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Owner identifier (defaults to a fresh UUID)
    #[arg(long)]
    pub owner: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Journal entry text (overrides stdin/prompt)
    #[arg(long, conflicts_with = "template")]
    pub body: Option<String>,

    /// Record an assessment response for this template
    #[arg(short, long, value_name = "TEMPLATE_ID")]
    pub template: Option<String>,

    /// Assessment answer as question_id=value (repeatable)
    #[arg(short, long, value_name = "QUESTION=VALUE", requires = "template")]
    pub answer: Vec<String>,

    /// Set custom date/time (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Record kind filter accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Journal,
    Assessment,
}

impl From<KindArg> for RecordKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Journal => RecordKind::JournalEntry,
            KindArg::Assessment => RecordKind::AssessmentResponse,
        }
    }
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Only show one kind of record
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Record ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Record ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Output encoding: document (paginated text) or interchange (JSON)
    #[arg(short, long, default_value = "document")]
    pub format: ExportFormat,

    /// Record to include (full UUID or prefix, repeatable)
    #[arg(short, long = "select", value_name = "ID", required_unless_present = "all")]
    pub select: Vec<String>,

    /// Include every readable record
    #[arg(long, conflicts_with = "select")]
    pub all: bool,

    /// Output file ("-" for stdout; defaults to a timestamped name)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Document page width in characters
    #[arg(long)]
    pub page_width: Option<usize>,

    /// Document page height in lines
    #[arg(long)]
    pub page_height: Option<usize>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `templates` command
#[derive(Args)]
pub struct TemplatesArgs {
    /// Show the questions of one template
    #[arg(value_name = "TEMPLATE_ID")]
    pub id: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_requires_selection() {
        assert!(Cli::try_parse_from(["vault", "export"]).is_err());
        assert!(Cli::try_parse_from(["vault", "export", "--all"]).is_ok());
        assert!(Cli::try_parse_from(["vault", "export", "-s", "abc", "-s", "def"]).is_ok());
        assert!(Cli::try_parse_from(["vault", "export", "--all", "-s", "abc"]).is_err());
    }

    #[test]
    fn test_answer_requires_template() {
        assert!(Cli::try_parse_from(["vault", "add", "--answer", "mood=3"]).is_err());
        assert!(Cli::try_parse_from(["vault", "add", "-t", "weekly", "-a", "mood=3"]).is_ok());
    }
}
