//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use switchboard_config::ConfigError;
use switchboard_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Remote outcomes ──────────────────────────────────────────────

    /// The console refused the change; its message is shown as-is.
    #[error("{message}")]
    #[diagnostic(code(switchboard::rejected))]
    Rejected { message: String },

    #[error("Your changes were not saved: {reason}")]
    #[diagnostic(
        code(switchboard::not_saved),
        help(
            "Check that the console is reachable and try again.\n\
             Try: switchboard list --insecure"
        )
    )]
    NotSaved { reason: String },

    #[error("Could not load switches: {reason}")]
    #[diagnostic(
        code(switchboard::load_failed),
        help("Check the console URL in your profile, or pass --console.")
    )]
    LoadFailed { reason: String },

    #[error("The console did not answer in time")]
    #[diagnostic(
        code(switchboard::timeout),
        help(
            "Increase timeout with --timeout. A change may still have been\n\
             applied; run `switchboard show <key>` to check."
        )
    )]
    Timeout,

    // ── Resources ────────────────────────────────────────────────────

    #[error("switch '{key}' not found")]
    #[diagnostic(
        code(switchboard::not_found),
        help("Run: switchboard list to see available switches")
    )]
    NotFound { key: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(switchboard::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found")]
    #[diagnostic(
        code(switchboard::no_config),
        help(
            "Create one with: switchboard config init\n\
             Or pass --console <URL>.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(switchboard::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: switchboard config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(switchboard::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(switchboard::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    #[diagnostic(code(switchboard::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotSaved { .. } | Self::LoadFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

fn is_timeout(reason: &str) -> bool {
    reason.to_ascii_lowercase().contains("timed out")
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Application { message } => CliError::Rejected { message },

            CoreError::Transport { reason } | CoreError::LoadFailed { reason }
                if is_timeout(&reason) =>
            {
                CliError::Timeout
            }
            CoreError::Transport { reason } => CliError::NotSaved { reason },
            CoreError::LoadFailed { reason } => CliError::LoadFailed { reason },

            CoreError::SwitchNotFound { key } => CliError::NotFound { key },

            CoreError::UnknownField { field } => CliError::Validation {
                field: "field".into(),
                reason: format!("the console has no condition field '{field}'"),
            },
            CoreError::InvalidFieldPath { raw } => CliError::Validation {
                field: "field".into(),
                reason: format!("'{raw}' is not of the form namespace,name"),
            },
            CoreError::InvalidStatus { value } => CliError::Validation {
                field: "status".into(),
                reason: format!("'{value}' is not a switch status"),
            },
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "console".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
