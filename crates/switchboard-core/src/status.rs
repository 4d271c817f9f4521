// ── Status transitions and display ──
//
// Pure functions over `Status`. Any status may follow any other; the only
// guarded transition is entry into ACTIVE, and the only derived
// correction is CONDITIONAL-without-conditions displaying as ACTIVE.

use serde::Serialize;

use crate::model::{Status, Switch};

/// How a switch's status should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    /// The status to present, after correction.
    pub status: Status,
    /// Human label for `status`.
    pub label: &'static str,
    /// `true` when the stored status is CONDITIONAL but nothing can match,
    /// so the switch is presented as ACTIVE.
    pub conditional_collapses_to_active: bool,
}

/// Derive the displayed status for `switch`.
///
/// The switch itself is never modified: its stored status remains
/// whatever the console reported.
pub fn compute_display(switch: &Switch) -> StatusDisplay {
    let collapses = switch.status == Status::Conditional && switch.conditions.is_empty();
    let status = if collapses { Status::Active } else { switch.status };
    StatusDisplay {
        status,
        label: status.label(),
        conditional_collapses_to_active: collapses,
    }
}

/// Whether moving a switch to `target` needs explicit user confirmation.
///
/// Activation affects every request globally.
pub fn requires_confirmation(target: Status) -> bool {
    target == Status::Active
}

/// The question put to the user before activating `key`.
pub fn confirmation_prompt(key: &str) -> String {
    format!("Activate '{key}' globally for everyone?")
}

/// Statuses that can be offered for a switch.
///
/// INHERIT only makes sense where a parent scope exists to defer to.
pub fn available_statuses(has_parent: bool) -> Vec<Status> {
    let mut statuses = vec![Status::Disabled, Status::Conditional, Status::Active];
    if has_parent {
        statuses.push(Status::Inherit);
    }
    statuses
}
