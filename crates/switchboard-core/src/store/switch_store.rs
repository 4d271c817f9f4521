// ── SwitchStore ──
//
// The console's single source of truth for server-confirmed switch state.
// Each mutation publishes exactly the render work it implies: one keyed
// upsert or removal, plus an empty-state toggle when the collection
// crosses between empty and non-empty. Only a full load resets the view.

use std::sync::Arc;

use indexmap::map;
use tokio::sync::{broadcast, watch};
use tracing::trace;

use super::collection::{OrderedCollection, Snapshot};
use crate::model::Switch;

/// Capacity of the render-event channel. A renderer that falls further
/// behind than this sees `Lagged` and must rebuild from a snapshot.
const EVENT_CAPACITY: usize = 256;

/// Render work implied by a store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// The whole collection was replaced; redraw everything.
    Reset,
    /// The switch under this key was inserted or replaced.
    Upsert(String),
    /// The switch under this key is gone.
    Remove(String),
    /// The "no switches" placeholder should be shown (`true`) or hidden.
    EmptyState(bool),
}

/// In-memory, insertion-ordered collection of switches keyed by `key`.
pub struct SwitchStore {
    switches: OrderedCollection<Switch>,
    events: broadcast::Sender<RenderEvent>,
}

impl Default for SwitchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            switches: OrderedCollection::new(),
            events,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Insert or replace a switch by key. Returns `true` if it was new.
    pub fn upsert(&self, switch: Switch) -> bool {
        let key = switch.key.clone();
        let was_empty = self.switches.is_empty();
        let is_new = self.switches.upsert(key.clone(), switch);
        if was_empty {
            self.emit(RenderEvent::EmptyState(false));
        }
        self.emit(RenderEvent::Upsert(key));
        is_new
    }

    /// Store `switch` in the slot previously held by `old_key`.
    ///
    /// Used when an update changes a switch's key. The row keeps its
    /// display position; the view sees the old key removed and the new
    /// key rendered.
    pub fn rename(&self, old_key: &str, switch: Switch) {
        if switch.key == old_key {
            self.upsert(switch);
            return;
        }
        let new_key = switch.key.clone();
        let was_empty = self.switches.is_empty();
        let had_old = self.switches.replace_key(old_key, new_key.clone(), switch);
        if was_empty {
            self.emit(RenderEvent::EmptyState(false));
        }
        if had_old {
            self.emit(RenderEvent::Remove(old_key.to_owned()));
        }
        self.emit(RenderEvent::Upsert(new_key));
    }

    /// Delete a switch by key. Absent keys are a no-op, not an error.
    pub fn remove(&self, key: &str) -> Option<Arc<Switch>> {
        let removed = self.switches.remove(key)?;
        self.emit(RenderEvent::Remove(key.to_owned()));
        if self.switches.is_empty() {
            self.emit(RenderEvent::EmptyState(true));
        }
        Some(removed)
    }

    /// Replace everything with a freshly loaded listing, in server order.
    pub fn replace_all(&self, switches: Vec<Switch>) {
        self.switches
            .replace_all(switches.into_iter().map(|s| (s.key.clone(), s)));
        self.emit(RenderEvent::Reset);
        self.emit(RenderEvent::EmptyState(self.switches.is_empty()));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<Arc<Switch>> {
        self.switches.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.switches.contains(key)
    }

    /// Every switch in display order.
    ///
    /// The returned listing is detached from later mutations and can be
    /// iterated any number of times.
    pub fn all(&self) -> Listing {
        Listing {
            snapshot: self.switches.snapshot(),
        }
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }

    /// Monotonic mutation counter.
    pub fn version(&self) -> u64 {
        self.switches.version()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Keyed render events, in mutation order.
    pub fn events(&self) -> broadcast::Receiver<RenderEvent> {
        self.events.subscribe()
    }

    /// Whole-collection snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Switch>> {
        self.switches.subscribe()
    }

    fn emit(&self, event: RenderEvent) {
        trace!(?event, "render event");
        // No subscribers is fine: nothing is on screen yet.
        let _ = self.events.send(event);
    }
}

// ── Listing ──────────────────────────────────────────────────────────

/// A point-in-time, restartable sequence of switches in display order.
#[derive(Debug, Clone)]
pub struct Listing {
    snapshot: Snapshot<Switch>,
}

impl Listing {
    /// A fresh iterator from the first switch.
    pub fn iter(&self) -> ListingIter<'_> {
        ListingIter {
            inner: self.snapshot.values(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Switch>> {
        self.snapshot.get(key)
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Arc<Switch>;
    type IntoIter = ListingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`Listing`].
#[derive(Debug, Clone)]
pub struct ListingIter<'a> {
    inner: map::Values<'a, String, Arc<Switch>>,
}

impl<'a> Iterator for ListingIter<'a> {
    type Item = &'a Arc<Switch>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ListingIter<'_> {}
