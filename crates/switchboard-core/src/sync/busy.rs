// ── Busy indicator ──
//
// A shared in-flight request counter. The indicator is visible while the
// count is non-zero. Each call holds a `BusyGuard` whose drop releases
// its slot, so completion, failure, timeout and an abandoned future all
// clear it the same way.

use std::sync::Arc;

use tokio::sync::watch;

/// Reference-counted busy state shared by every in-flight call.
#[derive(Debug, Clone)]
pub struct BusyIndicator {
    count: Arc<watch::Sender<usize>>,
}

impl Default for BusyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyIndicator {
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            count: Arc::new(count),
        }
    }

    /// Register one in-flight call. The slot is released when the guard
    /// is dropped.
    #[must_use = "the call counts as finished as soon as the guard is dropped"]
    pub fn begin(&self) -> BusyGuard {
        self.count.send_modify(|n| *n += 1);
        BusyGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Calls currently outstanding.
    pub fn in_flight(&self) -> usize {
        *self.count.borrow()
    }

    pub fn is_visible(&self) -> bool {
        self.in_flight() > 0
    }

    /// Observe the in-flight count.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }
}

/// Holds one slot of a [`BusyIndicator`].
#[derive(Debug)]
pub struct BusyGuard {
    count: Arc<watch::Sender<usize>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.count.send_modify(|n| *n = n.saturating_sub(1));
    }
}
