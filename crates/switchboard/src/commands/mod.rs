//! Command dispatch: bridges CLI args -> engine intents -> output formatting.

pub mod conditions;
pub mod config_cmd;
pub mod switches;
pub mod util;

use switchboard_core::{Console, SortOrder};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a console-bound command to the appropriate handler.
///
/// `sort` is the listing order used for the initial load when the command
/// does not pick its own.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    sort: SortOrder,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => switches::list(console, args, sort, global).await,
        Command::Show { key } => switches::show(console, &key, sort, global).await,
        Command::Add(args) => switches::add(console, args, global).await,
        Command::Update {
            key,
            new_key,
            name,
            description,
        } => switches::update(console, key, new_key, name, description, sort, global).await,
        Command::Delete { key } => switches::delete(console, key, global).await,
        Command::Status { key, status } => switches::status(console, key, status, global).await,
        Command::Condition(args) => conditions::handle(console, args, sort, global).await,
        Command::Summary => switches::summary(console, sort, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a console connection".into(),
        )),
    }
}
