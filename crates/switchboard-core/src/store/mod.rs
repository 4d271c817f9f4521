// ── Switch storage ──

mod collection;
mod refresh;
mod switch_store;

pub use collection::Snapshot;
pub use refresh::IndexPayload;
pub use switch_store::{Listing, ListingIter, RenderEvent, SwitchStore};
