// ── Ordered reactive collection ──
//
// Keyed storage that preserves insertion order, with push-based change
// notification via `watch` channels. The snapshot channel doubles as the
// storage itself: every mutation goes through `send_modify`, so readers
// always observe a complete, consistent map and never contend on a lock.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;

/// Immutable, cheaply cloned view of a collection in display order.
pub type Snapshot<T> = Arc<IndexMap<String, Arc<T>>>;

/// A reactive, insertion-ordered collection for a single entity type.
///
/// Replacing an existing key keeps its position; new keys are appended.
/// Every mutation bumps a version counter and publishes a new snapshot.
pub(crate) struct OrderedCollection<T: Send + Sync + 'static> {
    /// Current contents, published to subscribers on every mutation.
    state: watch::Sender<Snapshot<T>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,
}

impl<T: Send + Sync + 'static> OrderedCollection<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(IndexMap::new()));
        let (version, _) = watch::channel(0u64);
        Self { state, version }
    }

    /// Insert or replace an entity. Returns `true` if the key was new.
    pub(crate) fn upsert(&self, key: String, entity: T) -> bool {
        let mut is_new = false;
        self.mutate(|map| {
            is_new = map.insert(key, Arc::new(entity)).is_none();
        });
        is_new
    }

    /// Store `entity` under `new_key`, taking over the slot held by
    /// `old_key`. Returns `true` if `old_key` was present.
    ///
    /// If `old_key` is absent this degrades to a plain upsert.
    pub(crate) fn replace_key(&self, old_key: &str, new_key: String, entity: T) -> bool {
        let mut had_old = false;
        self.mutate(|map| {
            let entity = Arc::new(entity);
            match map.shift_remove_full(old_key) {
                Some((index, _, _)) if !map.contains_key(&new_key) => {
                    had_old = true;
                    map.shift_insert(index, new_key, entity);
                }
                Some(_) => {
                    had_old = true;
                    map.insert(new_key, entity);
                }
                None => {
                    map.insert(new_key, entity);
                }
            }
        });
        had_old
    }

    /// Remove an entity by key. Returns the removed entity if it existed.
    ///
    /// Removing an absent key publishes nothing.
    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        if !self.contains(key) {
            return None;
        }
        let mut removed = None;
        self.mutate(|map| removed = map.shift_remove(key));
        removed
    }

    /// Replace the whole contents, in the given order.
    pub(crate) fn replace_all(&self, items: impl IntoIterator<Item = (String, T)>) {
        let fresh: IndexMap<String, Arc<T>> = items
            .into_iter()
            .map(|(key, entity)| (key, Arc::new(entity)))
            .collect();
        self.state.send_modify(|snap| *snap = Arc::new(fresh));
        self.bump_version();
    }

    /// Look up an entity by key.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.state.borrow().get(key).map(Arc::clone)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.state.borrow().contains_key(key)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Apply `f` to a private copy of the map and publish the result.
    ///
    /// `Arc::make_mut` only clones when a subscriber still holds the
    /// previous snapshot.
    fn mutate(&self, f: impl FnOnce(&mut IndexMap<String, Arc<T>>)) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state.send_modify(|snap| f(Arc::make_mut(snap)));
        self.bump_version();
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
