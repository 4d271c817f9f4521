// ── Intent API ──
//
// Every mutation flows through the `Intent` enum. The console routes
// each variant to its endpoint and applies the canonical reply to the
// store; the outcome tells the caller what, if anything, changed.

pub mod requests;

use std::future::Future;

use switchboard_api::Endpoint;

use crate::model::Status;
use crate::status;

pub use requests::{AddConditionRequest, FormParams, RemoveConditionRequest, SwitchDetails};

/// A user-initiated change to the console's switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    // ── Switch lifecycle ─────────────────────────────────────────────
    AddSwitch(SwitchDetails),
    /// Update label/description, and rename when `details.key != curkey`.
    UpdateSwitch {
        curkey: String,
        details: SwitchDetails,
    },
    DeleteSwitch {
        key: String,
    },

    // ── Status ───────────────────────────────────────────────────────
    ChangeStatus {
        key: String,
        status: Status,
    },

    // ── Conditions ───────────────────────────────────────────────────
    AddCondition(AddConditionRequest),
    RemoveCondition(RemoveConditionRequest),
}

impl Intent {
    /// The endpoint this intent is sent to.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::AddSwitch(_) => Endpoint::AddSwitch,
            Self::UpdateSwitch { .. } => Endpoint::UpdateSwitch,
            Self::DeleteSwitch { .. } => Endpoint::DeleteSwitch,
            Self::ChangeStatus { .. } => Endpoint::UpdateStatus,
            Self::AddCondition(_) => Endpoint::AddCondition,
            Self::RemoveCondition(_) => Endpoint::DelCondition,
        }
    }

    /// The key of the switch this intent addresses, as it exists now.
    pub fn target_key(&self) -> &str {
        match self {
            Self::AddSwitch(details) => &details.key,
            Self::UpdateSwitch { curkey, .. } => curkey,
            Self::DeleteSwitch { key } | Self::ChangeStatus { key, .. } => key,
            Self::AddCondition(req) => &req.key,
            Self::RemoveCondition(req) => &req.key,
        }
    }

    /// Form-encoded parameters for the request body.
    pub fn form(&self) -> FormParams {
        match self {
            Self::AddSwitch(details) => details.form(),
            Self::UpdateSwitch { curkey, details } => {
                let mut form = vec![("curkey".to_owned(), curkey.clone())];
                form.extend(details.form());
                form
            }
            Self::DeleteSwitch { key } => vec![("key".to_owned(), key.clone())],
            Self::ChangeStatus { key, status } => vec![
                ("key".to_owned(), key.clone()),
                ("status".to_owned(), status.wire_value().to_string()),
            ],
            Self::AddCondition(req) => req.form(),
            Self::RemoveCondition(req) => req.form(),
        }
    }

    /// Whether the user must confirm before this intent is sent.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::ChangeStatus { status, .. } if status::requires_confirmation(*status))
    }
}

/// What a dispatched intent did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The switch under this key was inserted or replaced.
    Applied(String),
    /// The switch under this key was deleted.
    Removed(String),
    /// The console reported a different status than requested, most
    /// likely because a concurrent edit won. Nothing was changed.
    Stale { requested: Status, reported: Status },
    /// The user declined confirmation; nothing was sent.
    Cancelled,
}

impl Outcome {
    /// Key of the switch the store now holds for this outcome, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Applied(key) => Some(key),
            _ => None,
        }
    }
}

// ── Confirmation ─────────────────────────────────────────────────────

/// Asks the user to approve a guarded intent.
///
/// Implemented for closures, so tests and simple front ends can pass
/// `|_: &Intent| async { true }`.
pub trait Confirm: Send + Sync {
    fn confirm(&self, intent: &Intent) -> impl Future<Output = bool> + Send;
}

impl<F, Fut> Confirm for F
where
    F: Fn(&Intent) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send,
{
    fn confirm(&self, intent: &Intent) -> impl Future<Output = bool> + Send {
        self(intent)
    }
}

/// Approves everything. For non-interactive use (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    async fn confirm(&self, _intent: &Intent) -> bool {
        true
    }
}
