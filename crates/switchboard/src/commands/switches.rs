//! Switch command handlers.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use switchboard_core::{AlwaysConfirm, Console, Intent, SortOrder, Status, SwitchDetails};

use crate::cli::{DetailsArgs, GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;
use crate::view::{Rendered, TerminalView};

use super::util::{self, PromptConfirm};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Conditions")]
    conditions: usize,
    #[tabled(rename = "Modified")]
    modified: String,
}

impl SwitchRow {
    fn new(r: &Rendered, color: bool) -> Self {
        Self {
            key: r.switch.key.clone(),
            label: r.switch.name.clone().unwrap_or_default(),
            status: output::paint_status(r.display.status, r.display.label, color),
            conditions: r.switch.conditions.len(),
            modified: r
                .switch
                .date_modified
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Multi-line detail view of one switch.
pub fn detail(r: &Rendered, color: bool) -> String {
    let s = &r.switch;
    let mut out = String::new();
    let _ = writeln!(out, "Key:          {}", s.key);
    let _ = writeln!(out, "Label:        {}", s.display_name());
    if let Some(ref desc) = s.description {
        let _ = writeln!(out, "Description:  {desc}");
    }
    let status = output::paint_status(r.display.status, r.display.label, color);
    if r.display.conditional_collapses_to_active {
        let _ = writeln!(out, "Status:       {status} (conditional, no conditions yet)");
    } else {
        let _ = writeln!(out, "Status:       {status}");
    }
    if let Some(created) = s.date_created {
        let _ = writeln!(out, "Created:      {}", created.to_rfc3339());
    }
    if let Some(modified) = s.date_modified {
        let _ = writeln!(out, "Modified:     {}", modified.to_rfc3339());
    }
    if s.conditions.is_empty() {
        let _ = write!(out, "Conditions:   (none)");
    } else {
        let _ = write!(out, "Conditions:");
        for c in &s.conditions {
            let exclude = if c.exclude { "  [exclude]" } else { "" };
            let _ = write!(
                out,
                "\n  {} {} = {}{exclude}",
                c.id,
                c.field,
                c.display_value()
            );
        }
    }
    out
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(
    console: &Console,
    args: ListArgs,
    default_sort: SortOrder,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut renderer = console.renderer();
    console.load(args.sort.unwrap_or(default_sort)).await?;

    let mut view = TerminalView::new();
    renderer.pump(&mut view);
    if let Some(ref query) = args.search {
        renderer.set_query(&mut view, query);
    }

    if view.shows_placeholder() && matches!(global.output, crate::cli::OutputFormat::Table) {
        if !global.quiet {
            eprintln!("No switches yet. Create one with: switchboard add <key>");
        }
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let rows = view.visible();
    let out = output::render_list(
        &global.output,
        &rows,
        |r| SwitchRow::new(r, color),
        |r| r.switch.key.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(
    console: &Console,
    key: &str,
    sort: SortOrder,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    console.load(sort).await?;
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
    Ok(())
}

pub async fn add(console: &Console, args: DetailsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let details = SwitchDetails {
        key: args.key,
        name: args.name,
        description: args.description,
    };
    let key = details.key.clone();
    let outcome = console
        .dispatch(Intent::AddSwitch(details), &AlwaysConfirm)
        .await?;
    util::report_outcome(console, &key, &outcome, global)
}

/// Label and description are replaced wholesale by the console, so any
/// value not given on the command line is carried over from the current
/// switch.
pub async fn update(
    console: &Console,
    key: String,
    new_key: Option<String>,
    name: Option<String>,
    description: Option<String>,
    sort: SortOrder,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    console.load(sort).await?;
    let current = console.require(&key)?;
    let details = SwitchDetails {
        key: new_key.unwrap_or_else(|| key.clone()),
        name: name.or_else(|| current.name.clone()),
        description: description.or_else(|| current.description.clone()),
    };
    let intent = Intent::UpdateSwitch {
        curkey: key.clone(),
        details,
    };
    let outcome = console.dispatch(intent, &AlwaysConfirm).await?;
    util::report_outcome(console, &key, &outcome, global)
}

pub async fn delete(console: &Console, key: String, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm(&format!("Delete switch '{key}'?"), global.yes)? {
        return Ok(());
    }
    let outcome = console
        .dispatch(Intent::DeleteSwitch { key: key.clone() }, &AlwaysConfirm)
        .await?;
    util::report_outcome(console, &key, &outcome, global)
}

pub async fn status(
    console: &Console,
    key: String,
    status: Status,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let intent = Intent::ChangeStatus {
        key: key.clone(),
        status,
    };
    let confirm = PromptConfirm::for_intent(&intent, global)?;
    let outcome = console.dispatch(intent, &confirm).await?;
    util::report_outcome(console, &key, &outcome, global)
}

// ── Summary ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SummaryOut {
    enabled_count: usize,
    switches: Vec<Rendered>,
}

pub async fn summary(console: &Console, sort: SortOrder, global: &GlobalOpts) -> Result<(), CliError> {
    console.load(sort).await?;
    let summary = console.summary();
    let out = SummaryOut {
        enabled_count: summary.enabled_count,
        switches: summary
            .switches
            .iter()
            .map(|s| Rendered::from(&**s))
            .collect(),
    };

    let color = output::should_color(&global.color);
    let rendered = output::render_single(
        &global.output,
        &out,
        |o| {
            let rows: Vec<SwitchRow> = o.switches.iter().map(|r| SwitchRow::new(r, color)).collect();
            let noun = if o.enabled_count == 1 { "switch" } else { "switches" };
            if rows.is_empty() {
                format!("{} {noun} enabled", o.enabled_count)
            } else {
                format!(
                    "{} {noun} enabled\n{}",
                    o.enabled_count,
                    output::render_table(&rows)
                )
            }
        },
        |o| {
            o.switches
                .iter()
                .map(|r| r.switch.key.clone())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use switchboard_core::{Condition, FieldPath, Switch};

    use super::*;

    #[test]
    fn detail_notes_collapsed_conditional() {
        let r = Rendered::from(&Switch::new("beta", Status::Conditional));
        let text = detail(&r, false);
        assert!(text.contains("Status:       Active (conditional, no conditions yet)"));
        assert!(text.contains("Conditions:   (none)"));
    }

    #[test]
    fn detail_lists_conditions_with_exclusions() {
        let mut s = Switch::new("beta", Status::Conditional);
        let mut c = Condition::new("user", FieldPath::new("user", "username").unwrap(), "alice");
        c.exclude = true;
        s.conditions.push(c);
        let text = detail(&Rendered::from(&s), false);
        assert!(text.contains("Status:       Conditional"));
        assert!(text.contains("user user,username = alice  [exclude]"));
    }
}
