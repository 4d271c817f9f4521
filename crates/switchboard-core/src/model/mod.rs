// ── Domain model ──
//
// Canonical types as the console serves them, plus the structured field
// identifier and condition catalog used by the editor.

pub mod catalog;
pub mod field;
pub mod sort;
pub mod status;
pub mod switch;

pub use catalog::{Catalog, ConditionSet, FieldDef, FieldKind};
pub use field::FieldPath;
pub use sort::{SortField, SortOrder};
pub use status::Status;
pub use switch::{Condition, Switch};
