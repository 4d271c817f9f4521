//! Condition command handlers.

use indexmap::IndexMap;
use tracing::debug;

use switchboard_core::{
    AddConditionRequest, AlwaysConfirm, ConditionEditor, Console, CoreError, FieldPath, Intent,
    SortOrder,
};

use crate::cli::{ConditionArgs, ConditionCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    console: &Console,
    args: ConditionArgs,
    sort: SortOrder,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Both forms need the switch (and the catalog) as the console has it.
    console.load(sort).await?;

    let intent = match args.command {
        ConditionCommand::Add {
            key,
            set,
            field,
            value,
            inputs,
            exclude,
        } => add_intent(console, key, &set, field, value, inputs, exclude)?,

        ConditionCommand::Remove {
            key,
            set,
            field,
            value,
        } => {
            let switch = console.require(&key)?;
            let condition =
                switch
                    .condition(&set, &field, &value)
                    .ok_or_else(|| CliError::Validation {
                        field: "condition".into(),
                        reason: format!("'{key}' has no {set} condition {field} = {value}"),
                    })?;
            ConditionEditor::submit_remove(&switch, condition)
        }
    };

    let key = intent.target_key().to_owned();
    let outcome = console.dispatch(intent, &AlwaysConfirm).await?;
    util::report_outcome(console, &key, &outcome, global)
}

/// Build an add-condition intent through the editor when the console
/// advertises its condition fields, or straight from the given inputs
/// when it does not.
fn add_intent(
    console: &Console,
    key: String,
    set: &str,
    field: FieldPath,
    value: Option<String>,
    inputs: Vec<(String, String)>,
    exclude: bool,
) -> Result<Intent, CliError> {
    if console.catalog().is_empty() {
        console.require(&key)?;
        debug!(%key, %field, "no condition catalog, sending inputs as given");
        let mut values = IndexMap::new();
        if let Some(value) = value {
            values.insert(field.name().to_owned(), value);
        }
        values.extend(inputs);
        return Ok(Intent::AddCondition(AddConditionRequest {
            key,
            set_id: set.to_owned(),
            field,
            values,
            exclude,
        }));
    }

    let catalog = console.catalog();
    if catalog.set(set).is_none() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("the console has no condition set '{set}'"),
        });
    }
    match catalog.field(&field) {
        Some((owner, _)) if owner.id != set => {
            return Err(CliError::Validation {
                field: "set".into(),
                reason: format!("field {field} belongs to condition set '{}'", owner.id),
            });
        }
        Some(_) => {}
        None => {
            return Err(CoreError::UnknownField {
                field: field.to_string(),
            }
            .into());
        }
    }

    let mut form = console.open_condition_form(&key)?;
    form.select_field(&field)?;
    if let Some(ref value) = value {
        form.set_input(field.name(), value)?;
    }
    for (name, raw) in &inputs {
        form.set_input(name, raw)?;
    }
    form.set_exclude(exclude);
    Ok(console.editor().submit_add(&form)?)
}
