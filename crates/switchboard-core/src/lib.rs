//! State-sync engine between `switchboard-api` and console front ends.
//!
//! This crate owns the client-held model of switches and conditions, the
//! status rules, and the protocol that keeps a view consistent with
//! server-confirmed state:
//!
//! - **[`Console`]**: Central facade. [`load()`](Console::load) fetches the
//!   listing (the one full redraw); [`dispatch()`](Console::dispatch) sends an
//!   [`Intent`] and applies the canonical reply to the store, in completion
//!   order.
//!
//! - **[`SwitchStore`]**: Insertion-ordered reactive storage built on
//!   `tokio::sync::watch` snapshots. Every mutation publishes exactly one
//!   keyed [`RenderEvent`] (plus an empty-state toggle at the boundary).
//!
//! - **[`SyncClient`]**: Mediates every request: reference-counted busy
//!   indicator, `{success, data}` envelope handling, and user-visible
//!   [`Notice`]s. Failures never reach the store.
//!
//! - **[`status`]**: Pure status rules: display labels, the
//!   CONDITIONAL-without-conditions collapse, and the confirmation guard
//!   on activation.
//!
//! - **[`ConditionEditor`]**: Sub-form selection and value coercion for
//!   adding conditions, driven by the console's [`Catalog`].
//!
//! - **[`search`]**: Client-side scoring and hidden-marker classification.
//!
//! - **[`view`]**: The [`SwitchView`] contract and a [`Renderer`] that feeds
//!   it.

pub mod command;
pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod model;
pub mod search;
pub mod status;
pub mod store;
pub mod sync;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{AlwaysConfirm, Confirm, Intent, Outcome};
pub use config::{ConsoleConfig, TlsVerification};
pub use console::{Console, Summary};
pub use editor::{ConditionEditor, FormState, Input, InputKind, SubForm};
pub use error::CoreError;
pub use search::SearchIndex;
pub use status::{StatusDisplay, compute_display};
pub use store::{IndexPayload, Listing, RenderEvent, SwitchStore};
pub use sync::{BusyGuard, BusyIndicator, Notice, NoticeKind, SyncClient, Transport};
pub use view::{Renderer, SwitchView};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Catalog, Condition, ConditionSet, FieldDef, FieldKind, FieldPath, SortField, SortOrder, Status,
    Switch,
};

// The wire-level pieces consumers need to implement `Transport`.
pub use switchboard_api::{Endpoint, Envelope};
