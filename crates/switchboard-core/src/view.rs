// ── View contract ──
//
// The engine never renders anything itself. A front end implements
// `SwitchView`; a `Renderer` feeds it the keyed render work published by
// the store, plus busy and notice updates from the sync layer. Rendering
// is addressed by switch key and must be idempotent: drawing the same
// payload twice leaves the same result on screen.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::model::Switch;
use crate::search::SearchIndex;
use crate::status::{StatusDisplay, compute_display};
use crate::store::{RenderEvent, Snapshot, SwitchStore};
use crate::sync::Notice;

/// A surface that can show switches.
pub trait SwitchView {
    /// Draw (or redraw) the fragment for `switch`.
    fn render_switch(&mut self, switch: &Switch, display: StatusDisplay);

    /// Drop the fragment for `key`. Unknown keys are ignored.
    fn remove_switch(&mut self, key: &str);

    /// Drop every fragment.
    fn clear(&mut self);

    /// Show or hide the "no switches" placeholder.
    fn set_empty_placeholder(&mut self, visible: bool);

    /// Mark a fragment hidden by the current search.
    fn set_hidden(&mut self, _key: &str, _hidden: bool) {}

    /// Show or hide the global busy indicator.
    fn set_busy(&mut self, _busy: bool) {}

    /// Present a failure to the user.
    fn show_notice(&mut self, _notice: &Notice) {}
}

/// Applies store and sync updates to a [`SwitchView`].
pub struct Renderer {
    events: broadcast::Receiver<RenderEvent>,
    snapshot: watch::Receiver<Snapshot<Switch>>,
    busy: Option<watch::Receiver<usize>>,
    notices: Option<broadcast::Receiver<Notice>>,
    query: String,
}

impl Renderer {
    /// A renderer following `store`.
    pub fn new(store: &SwitchStore) -> Self {
        Self {
            events: store.events(),
            snapshot: store.subscribe(),
            busy: None,
            notices: None,
            query: String::new(),
        }
    }

    /// Also mirror a busy counter onto the view.
    #[must_use]
    pub fn with_busy(mut self, busy: watch::Receiver<usize>) -> Self {
        self.busy = Some(busy);
        self
    }

    /// Also forward failure notices to the view.
    #[must_use]
    pub fn with_notices(mut self, notices: broadcast::Receiver<Notice>) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Draw everything from scratch. Used for the first paint and after
    /// falling too far behind the event stream.
    pub fn render_all(&mut self, view: &mut impl SwitchView) {
        let snap = self.snapshot.borrow_and_update().clone();
        view.clear();
        for switch in snap.values() {
            view.render_switch(switch, compute_display(switch));
        }
        self.apply_visibility(view, snap.values());
        view.set_empty_placeholder(snap.is_empty());
    }

    /// Apply every pending update without waiting. Returns how many
    /// render events were handled.
    pub fn pump(&mut self, view: &mut impl SwitchView) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.apply(view, &event);
                    handled += 1;
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "renderer lagged, redrawing");
                    self.render_all(view);
                    handled += 1;
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => break,
            }
        }
        self.pump_sync(view);
        handled
    }

    /// Wait for the next render event, then apply it and anything else
    /// pending. Returns `false` once the store is gone.
    pub async fn next(&mut self, view: &mut impl SwitchView) -> bool {
        match self.events.recv().await {
            Ok(event) => {
                self.apply(view, &event);
                self.pump(view);
                true
            }
            Err(broadcast::error::RecvError::Lagged(_)) => {
                self.render_all(view);
                self.pump(view);
                true
            }
            Err(broadcast::error::RecvError::Closed) => false,
        }
    }

    /// Filter the view by `query`. Only hidden markers change.
    pub fn set_query(&mut self, view: &mut impl SwitchView, query: &str) {
        query.clone_into(&mut self.query);
        let snap = self.snapshot.borrow().clone();
        self.apply_visibility(view, snap.values());
    }

    fn apply(&mut self, view: &mut impl SwitchView, event: &RenderEvent) {
        match event {
            RenderEvent::Reset => self.render_all(view),
            RenderEvent::Upsert(key) => {
                let switch = self.snapshot.borrow_and_update().get(key).cloned();
                // Already superseded by a later removal: that event follows.
                if let Some(switch) = switch {
                    view.render_switch(&switch, compute_display(&switch));
                    self.apply_visibility(view, [&switch]);
                }
            }
            RenderEvent::Remove(key) => view.remove_switch(key),
            RenderEvent::EmptyState(empty) => view.set_empty_placeholder(*empty),
        }
    }

    fn apply_visibility<'a, I>(&self, view: &mut impl SwitchView, switches: I)
    where
        I: IntoIterator<Item = &'a Arc<Switch>>,
    {
        for (key, hidden) in SearchIndex::new(switches).classify(&self.query) {
            view.set_hidden(&key, hidden);
        }
    }

    fn pump_sync(&mut self, view: &mut impl SwitchView) {
        if let Some(busy) = self.busy.as_mut() {
            if busy.has_changed().unwrap_or(false) {
                let visible = *busy.borrow_and_update() > 0;
                view.set_busy(visible);
            }
        }
        if let Some(notices) = self.notices.as_mut() {
            loop {
                match notices.try_recv() {
                    Ok(notice) => view.show_notice(&notice),
                    Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                    Err(_) => break,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::model::{Status, Switch};
    use crate::status::StatusDisplay;

    /// Rows keyed by switch key, as a DOM table would hold them.
    #[derive(Default)]
    struct Rows {
        rows: IndexMap<String, (String, bool)>,
        placeholder: bool,
        renders: usize,
    }

    impl SwitchView for Rows {
        fn render_switch(&mut self, switch: &Switch, display: StatusDisplay) {
            self.renders += 1;
            let hidden = self.rows.get(&switch.key).is_some_and(|(_, h)| *h);
            self.rows
                .insert(switch.key.clone(), (display.label.to_owned(), hidden));
        }
        fn remove_switch(&mut self, key: &str) {
            self.rows.shift_remove(key);
        }
        fn clear(&mut self) {
            self.rows.clear();
        }
        fn set_empty_placeholder(&mut self, visible: bool) {
            self.placeholder = visible;
        }
        fn set_hidden(&mut self, key: &str, hidden: bool) {
            if let Some(row) = self.rows.get_mut(key) {
                row.1 = hidden;
            }
        }
    }

    #[test]
    fn initial_paint_shows_placeholder_for_empty_store() {
        let store = SwitchStore::new();
        let mut renderer = Renderer::new(&store);
        let mut view = Rows::default();
        renderer.render_all(&mut view);
        assert!(view.placeholder);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn upsert_renders_only_the_affected_row() {
        let store = SwitchStore::new();
        let mut renderer = Renderer::new(&store);
        let mut view = Rows::default();
        store.replace_all(vec![
            Switch::new("a", Status::Active),
            Switch::new("b", Status::Disabled),
        ]);
        renderer.pump(&mut view);
        assert_eq!(view.renders, 2);

        store.upsert(Switch::new("b", Status::Conditional));
        renderer.pump(&mut view);
        assert_eq!(view.renders, 3);
        assert_eq!(view.rows["b"].0, "Active");
        assert!(!view.placeholder);
    }

    #[test]
    fn removal_of_last_switch_shows_placeholder() {
        let store = SwitchStore::new();
        store.upsert(Switch::new("a", Status::Active));
        let mut renderer = Renderer::new(&store);
        let mut view = Rows::default();
        renderer.render_all(&mut view);

        store.remove("a");
        renderer.pump(&mut view);
        assert!(view.rows.is_empty());
        assert!(view.placeholder);
    }

    #[test]
    fn rendering_twice_is_idempotent() {
        let store = SwitchStore::new();
        let mut renderer = Renderer::new(&store);
        let mut view = Rows::default();

        let sw = Switch::new("a", Status::Disabled);
        store.upsert(sw.clone());
        renderer.pump(&mut view);
        let first: Vec<_> = view.rows.clone().into_iter().collect();

        store.upsert(sw);
        renderer.pump(&mut view);
        let second: Vec<_> = view.rows.clone().into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn query_hides_non_matching_rows() {
        let store = SwitchStore::new();
        store.upsert(Switch::new("beta", Status::Active));
        store.upsert(Switch::new("gamma", Status::Active));
        let mut renderer = Renderer::new(&store);
        let mut view = Rows::default();
        renderer.render_all(&mut view);

        renderer.set_query(&mut view, "beta");
        assert!(!view.rows["beta"].1);
        assert!(view.rows["gamma"].1);

        renderer.set_query(&mut view, "");
        assert!(view.rows.values().all(|(_, hidden)| !hidden));
    }
}
