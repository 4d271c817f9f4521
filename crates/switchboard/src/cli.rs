//! Clap derive structures for the `switchboard` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use switchboard_core::{FieldPath, SortOrder, Status, status};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// switchboard -- manage feature switches from the command line
#[derive(Debug, Parser)]
#[command(
    name = "switchboard",
    version,
    about = "Manage feature switches from the command line",
    long_about = "Lists, creates, and edits feature switches on a switch console.\n\n\
        Every change is sent to the console first; what is printed is what\n\
        the console confirmed.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Console profile to use
    #[arg(long, short = 'p', env = "SWITCHBOARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Console URL, the switches admin mount point (overrides profile)
    #[arg(long, short = 'c', env = "SWITCHBOARD_CONSOLE", global = true)]
    pub console: Option<String>,

    /// CSRF token sent with every change
    #[arg(long, env = "SWITCHBOARD_CSRF_TOKEN", global = true, hide_env = true)]
    pub csrf_token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SWITCHBOARD_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SWITCHBOARD_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SWITCHBOARD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one key per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List switches
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one switch with its conditions
    Show {
        /// Switch key
        key: String,
    },

    /// Create a switch
    Add(DetailsArgs),

    /// Edit a switch's label or description, or rename it
    Update {
        /// Current switch key
        key: String,

        /// Rename the switch to this key
        #[arg(long)]
        new_key: Option<String>,

        /// Display label
        #[arg(long)]
        name: Option<String>,

        /// Description
        #[arg(long = "desc")]
        description: Option<String>,
    },

    /// Delete a switch
    #[command(alias = "rm")]
    Delete {
        /// Switch key
        key: String,
    },

    /// Change a switch's status
    Status {
        /// Switch key
        key: String,

        /// New status: disabled, conditional or active
        #[arg(value_parser = parse_status)]
        status: Status,
    },

    /// Add or remove conditions
    #[command(alias = "cond")]
    Condition(ConditionArgs),

    /// Count enabled switches and show the oldest ones
    Summary,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Switch Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Sort order: label, date_created or date_modified, '-' prefix for
    /// descending (default from config, else -date_modified)
    #[arg(long, short = 's', allow_hyphen_values = true)]
    pub sort: Option<SortOrder>,

    /// Only show switches matching this text
    #[arg(long, short = 'f')]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct DetailsArgs {
    /// Switch key
    pub key: String,

    /// Display label
    #[arg(long)]
    pub name: Option<String>,

    /// Description
    #[arg(long = "desc")]
    pub description: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONDITIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConditionArgs {
    #[command(subcommand)]
    pub command: ConditionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConditionCommand {
    /// Add a condition to a switch
    Add {
        /// Switch key
        key: String,

        /// Condition set id
        #[arg(long)]
        set: String,

        /// Field to test, as namespace,name
        #[arg(long)]
        field: FieldPath,

        /// Value for the field's single input
        #[arg(long, conflicts_with = "inputs")]
        value: Option<String>,

        /// Named input value, e.g. --input 'percent[min]=0'
        #[arg(long = "input", value_name = "NAME=VALUE", value_parser = parse_input)]
        inputs: Vec<(String, String)>,

        /// Force the switch off when this condition matches
        #[arg(long)]
        exclude: bool,
    },

    /// Remove a condition from a switch
    #[command(alias = "rm")]
    Remove {
        /// Switch key
        key: String,

        /// Condition set id
        #[arg(long)]
        set: String,

        /// Field the condition tests, as namespace,name
        #[arg(long)]
        field: FieldPath,

        /// The condition's value
        #[arg(long)]
        value: String,
    },
}

/// Statuses this console can be set to. It has no parent scope, so
/// `inherit` is not among them.
fn parse_status(raw: &str) -> Result<Status, String> {
    let offered = status::available_statuses(false);
    raw.parse::<Status>()
        .ok()
        .filter(|s| offered.contains(s))
        .ok_or_else(|| {
            let names: Vec<String> = offered.iter().map(ToString::to_string).collect();
            format!("expected one of: {}", names.join(", "))
        })
}

fn parse_input(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn status_accepts_offered_values_case_insensitively() {
        assert_eq!(parse_status("active").unwrap(), Status::Active);
        assert_eq!(parse_status("Conditional").unwrap(), Status::Conditional);
        assert_eq!(parse_status("DISABLED").unwrap(), Status::Disabled);
    }

    #[test]
    fn status_without_parent_scope_rejects_inherit() {
        let err = parse_status("inherit").unwrap_err();
        assert_eq!(err, "expected one of: disabled, conditional, active");
        assert!(parse_status("sometimes").is_err());
    }

    #[test]
    fn input_pairs_split_on_first_equals() {
        assert_eq!(
            parse_input("percent[min]=0").unwrap(),
            ("percent[min]".to_owned(), "0".to_owned())
        );
        assert_eq!(
            parse_input("query=a=b").unwrap(),
            ("query".to_owned(), "a=b".to_owned())
        );
        assert!(parse_input("=1").is_err());
        assert!(parse_input("novalue").is_err());
    }

    #[test]
    fn descending_sort_is_not_mistaken_for_a_flag() {
        let cli = Cli::try_parse_from(["switchboard", "list", "--sort", "-label"]).unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.sort.unwrap().to_string(), "-label");
    }

    #[test]
    fn field_path_is_validated_at_parse_time() {
        let err = Cli::try_parse_from([
            "switchboard",
            "condition",
            "add",
            "beta",
            "--set",
            "user",
            "--field",
            "nocomma",
        ]);
        assert!(err.is_err());
    }
}
