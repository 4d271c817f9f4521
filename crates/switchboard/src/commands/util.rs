//! Shared helpers for command handlers.

use std::io::IsTerminal;

use switchboard_core::{Confirm, Console, Intent, Outcome, status};
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::view::Rendered;

use super::switches::detail;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Asks on the terminal before an intent the engine guards.
pub struct PromptConfirm {
    yes: bool,
}

impl PromptConfirm {
    /// Fails early when a prompt would be needed but nobody can answer it.
    pub fn for_intent(intent: &Intent, global: &GlobalOpts) -> Result<Self, CliError> {
        if intent.requires_confirmation() && !global.yes && !std::io::stdin().is_terminal() {
            return Err(CliError::NonInteractiveRequiresYes {
                action: format!("activate {}", intent.target_key()),
            });
        }
        Ok(Self { yes: global.yes })
    }
}

impl Confirm for PromptConfirm {
    async fn confirm(&self, intent: &Intent) -> bool {
        let prompt = status::confirmation_prompt(intent.target_key());
        let yes = self.yes;
        // dialoguer blocks on the terminal.
        let answer = tokio::task::spawn_blocking(move || confirm(&prompt, yes)).await;
        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(e)) => {
                debug!(error = %e, "confirmation prompt failed");
                false
            }
            Err(e) => {
                debug!(error = %e, "confirmation prompt aborted");
                false
            }
        }
    }
}

/// Print what a dispatched intent did.
pub fn report_outcome(
    console: &Console,
    intent_key: &str,
    outcome: &Outcome,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match outcome {
        Outcome::Applied(key) => {
            let switch = console.require(key)?;
            let rendered = Rendered::from(&*switch);
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &rendered,
                |r| detail(r, color),
                |r| r.switch.key.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }
        Outcome::Removed(key) => {
            if !global.quiet {
                eprintln!("✓ Switch '{key}' deleted");
            }
        }
        Outcome::Stale {
            requested,
            reported,
        } => {
            debug!(
                key = intent_key,
                %requested,
                %reported,
                "status reply superseded by a newer change, nothing shown"
            );
        }
        Outcome::Cancelled => {
            if !global.quiet {
                eprintln!("Cancelled; nothing was sent");
            }
        }
    }
    Ok(())
}
