//! Terminal view: collects what the engine renders so a command can print
//! it once the console has answered.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

use switchboard_core::{StatusDisplay, Switch, SwitchView, compute_display};

/// A switch as last rendered, with its presented status.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    #[serde(flatten)]
    pub switch: Switch,
    pub display: StatusDisplay,
}

impl From<&Switch> for Rendered {
    fn from(switch: &Switch) -> Self {
        Self {
            switch: switch.clone(),
            display: compute_display(switch),
        }
    }
}

/// Keyed rows in display order, plus the hidden markers and placeholder
/// state the engine asks for. Failures are not drawn here: the command
/// returns them and `main` prints the diagnostic.
#[derive(Debug, Default)]
pub struct TerminalView {
    rows: IndexMap<String, Rendered>,
    hidden: IndexMap<String, bool>,
    empty: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows not hidden by the current search, in display order.
    pub fn visible(&self) -> Vec<Rendered> {
        self.rows
            .values()
            .filter(|r| !self.hidden.get(&r.switch.key).copied().unwrap_or(false))
            .cloned()
            .collect()
    }

    /// Whether the engine asked for the "no switches" placeholder.
    pub fn shows_placeholder(&self) -> bool {
        self.empty
    }
}

impl SwitchView for TerminalView {
    fn render_switch(&mut self, switch: &Switch, display: StatusDisplay) {
        self.rows.insert(
            switch.key.clone(),
            Rendered {
                switch: switch.clone(),
                display,
            },
        );
    }

    fn remove_switch(&mut self, key: &str) {
        self.rows.shift_remove(key);
        self.hidden.shift_remove(key);
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.hidden.clear();
    }

    fn set_empty_placeholder(&mut self, visible: bool) {
        self.empty = visible;
    }

    fn set_hidden(&mut self, key: &str, hidden: bool) {
        self.hidden.insert(key.to_owned(), hidden);
    }

    fn set_busy(&mut self, busy: bool) {
        trace!(busy, "busy indicator");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use switchboard_core::{Renderer, Status, SwitchStore};

    use super::*;

    #[test]
    fn search_hides_without_dropping_rows() {
        let store = SwitchStore::new();
        let mut renderer = Renderer::new(&store);
        store.replace_all(vec![
            Switch::new("checkout_v2", Status::Active),
            Switch::new("dark_mode", Status::Disabled),
        ]);

        let mut view = TerminalView::new();
        renderer.pump(&mut view);
        assert_eq!(view.visible().len(), 2);
        assert!(!view.shows_placeholder());

        renderer.set_query(&mut view, "checkout");
        let shown = view.visible();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].switch.key, "checkout_v2");

        renderer.set_query(&mut view, "");
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn empty_listing_asks_for_placeholder() {
        let store = SwitchStore::new();
        let mut renderer = Renderer::new(&store);
        store.replace_all(Vec::new());

        let mut view = TerminalView::new();
        renderer.pump(&mut view);
        assert!(view.shows_placeholder());
        assert!(view.visible().is_empty());
    }

    #[test]
    fn conditional_without_conditions_renders_active() {
        let store = SwitchStore::new();
        let mut renderer = Renderer::new(&store);
        store.upsert(Switch::new("beta", Status::Conditional));

        let mut view = TerminalView::new();
        renderer.pump(&mut view);
        let row = &view.visible()[0];
        assert_eq!(row.display.status, Status::Active);
        assert_eq!(row.switch.status, Status::Conditional);
    }
}
