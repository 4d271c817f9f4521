// ── Console facade ──
//
// Owns the sync client and the store, routes intents to endpoints, and
// applies confirmed replies. Mutations run concurrently with no mutual
// exclusion: each reply replaces exactly one switch, in completion order,
// so the last reply to land for a key wins.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use switchboard_api::ConsoleClient;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::command::{Confirm, Intent, Outcome};
use crate::config::ConsoleConfig;
use crate::editor::{ConditionEditor, FormState};
use crate::error::CoreError;
use crate::model::{Catalog, SortOrder, Status, Switch};
use crate::search;
use crate::store::{IndexPayload, SwitchStore};
use crate::sync::{BusyIndicator, Notice, SyncClient, Transport};
use crate::view::Renderer;

/// How many switches the dashboard summary lists.
const SUMMARY_LIMIT: usize = 5;

/// At-a-glance view of what is switched on.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Switches whose status is anything but DISABLED.
    pub enabled_count: usize,
    /// The oldest few of them.
    pub switches: Vec<Arc<Switch>>,
}

/// The switch console's state-sync engine.
///
/// Cheaply cloneable; clones share the same store, busy indicator and
/// notice channel.
pub struct Console<T: Transport = ConsoleClient> {
    inner: Arc<ConsoleInner<T>>,
}

struct ConsoleInner<T> {
    sync: SyncClient<T>,
    store: SwitchStore,
    catalog: watch::Sender<Arc<Catalog>>,
}

impl<T: Transport> Clone for Console<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Console<ConsoleClient> {
    /// Build an HTTP-backed console from configuration. No request is
    /// made until `load` or `dispatch`.
    pub fn connect(config: &ConsoleConfig) -> Result<Self, CoreError> {
        let mut client = ConsoleClient::new(config.url.clone(), &config.http_settings())?;
        if let Some(ref token) = config.csrf_token {
            client = client.with_csrf_token(SecretString::from(token.expose_secret().to_owned()));
        }
        debug!(url = %config.url, "console client ready");
        Ok(Self::new(client))
    }
}

impl<T: Transport> Console<T> {
    pub fn new(transport: T) -> Self {
        let (catalog, _) = watch::channel(Arc::new(Catalog::default()));
        Self {
            inner: Arc::new(ConsoleInner {
                sync: SyncClient::new(transport),
                store: SwitchStore::new(),
                catalog,
            }),
        }
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch the full listing and replace the store with it.
    ///
    /// This is the only operation that redraws the whole view. The
    /// condition catalog is refreshed when the console includes one.
    /// Returns the number of switches loaded.
    pub async fn load(&self, sort: SortOrder) -> Result<usize, CoreError> {
        let payload = self.inner.sync.fetch_index(sort).await?;
        let index = IndexPayload::from_value(payload)
            .map_err(|e| self.inner.sync.report("index", e.into_load_failure()))?;

        let count = index.switches.len();
        if !index.catalog.is_empty() {
            self.set_catalog(index.catalog);
        }
        self.inner.store.replace_all(index.switches);
        info!(count, sort = %sort, "switches loaded");
        Ok(count)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Send `intent` to the console and apply the reply.
    ///
    /// Activating a switch asks `confirm` first; declining returns
    /// [`Outcome::Cancelled`] without sending anything. Application and
    /// transport failures return an error and leave the store untouched.
    /// A status reply that disagrees with the request is
    /// [`Outcome::Stale`], also leaving the store untouched.
    pub async fn dispatch<C: Confirm>(
        &self,
        intent: Intent,
        confirm: &C,
    ) -> Result<Outcome, CoreError> {
        if intent.requires_confirmation() && !confirm.confirm(&intent).await {
            debug!(key = intent.target_key(), "activation declined");
            return Ok(Outcome::Cancelled);
        }

        let endpoint = intent.endpoint();
        let form = intent.form();
        debug!(%endpoint, key = intent.target_key(), "dispatching intent");

        if let Intent::DeleteSwitch { key } = &intent {
            self.inner.sync.call(endpoint, &form).await?;
            self.inner.store.remove(key);
            info!(%key, "switch deleted");
            return Ok(Outcome::Removed(key.clone()));
        }

        let switch: Switch = self.inner.sync.call_for(endpoint, &form).await?;
        Ok(self.apply(&intent, switch))
    }

    /// Apply a confirmed canonical switch for `intent`.
    fn apply(&self, intent: &Intent, switch: Switch) -> Outcome {
        let key = switch.key.clone();
        match intent {
            Intent::ChangeStatus { status, .. } if switch.status != *status => {
                debug!(
                    %key,
                    requested = %status,
                    reported = %switch.status,
                    "status reply superseded, not applied"
                );
                return Outcome::Stale {
                    requested: *status,
                    reported: switch.status,
                };
            }
            Intent::UpdateSwitch { curkey, .. } => self.inner.store.rename(curkey, switch),
            _ => {
                self.inner.store.upsert(switch);
            }
        }
        info!(%key, endpoint = %intent.endpoint(), "switch updated");
        Outcome::Applied(key)
    }

    // ── Conditions ───────────────────────────────────────────────────

    /// The current condition catalog.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.inner.catalog.borrow().clone()
    }

    /// Replace the condition catalog, e.g. with a locally supplied one.
    pub fn set_catalog(&self, catalog: Catalog) {
        self.inner.catalog.send_replace(Arc::new(catalog));
    }

    /// An editor over the current catalog.
    pub fn editor(&self) -> ConditionEditor {
        ConditionEditor::new(Catalog::clone(&self.catalog()))
    }

    /// A fresh add-condition form for the switch under `key`.
    pub fn open_condition_form(&self, key: &str) -> Result<FormState, CoreError> {
        let switch = self.require(key)?;
        Ok(self.editor().open_form_for(&switch))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &SwitchStore {
        &self.inner.store
    }

    /// The switch under `key`, or [`CoreError::SwitchNotFound`].
    pub fn require(&self, key: &str) -> Result<Arc<Switch>, CoreError> {
        self.inner
            .store
            .get(key)
            .ok_or_else(|| CoreError::SwitchNotFound {
                key: key.to_owned(),
            })
    }

    /// Switches matching `query`, in display order.
    pub fn search(&self, query: &str) -> Vec<Arc<Switch>> {
        let listing = self.inner.store.all();
        search::filter(&listing, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Enabled-switch count plus the oldest few enabled switches.
    ///
    /// Switches without a creation date sort after dated ones, in store
    /// order.
    pub fn summary(&self) -> Summary {
        let listing = self.inner.store.all();
        let mut enabled: Vec<Arc<Switch>> = listing
            .iter()
            .filter(|s| s.status != Status::Disabled)
            .cloned()
            .collect();
        let enabled_count = enabled.len();
        enabled.sort_by_key(|s| (s.date_created.is_none(), s.date_created));
        enabled.truncate(SUMMARY_LIMIT);
        Summary {
            enabled_count,
            switches: enabled,
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// A renderer wired to this console's store, busy indicator and
    /// notices.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(&self.inner.store)
            .with_busy(self.inner.sync.busy().subscribe())
            .with_notices(self.inner.sync.notices())
    }

    pub fn busy(&self) -> &BusyIndicator {
        self.inner.sync.busy()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.sync.notices()
    }

    pub fn sync(&self) -> &SyncClient<T> {
        &self.inner.sync
    }
}
