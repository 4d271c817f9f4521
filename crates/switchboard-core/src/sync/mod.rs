// ── Sync client ──
//
// Every request to the console goes through `SyncClient::call`. It owns
// the busy indicator and the user-visible notice channel, and sorts each
// reply into payload, application refusal, or transport failure. It never
// touches the store: applying a payload is the caller's continuation.

mod busy;
mod transport;

use serde::de::DeserializeOwned;
use serde_json::Value;
use switchboard_api::Endpoint;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::SortOrder;

pub use busy::{BusyGuard, BusyIndicator};
pub use transport::Transport;

const NOTICE_CAPACITY: usize = 64;

/// Which kind of failure a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The console refused the request; its message is shown verbatim.
    Application,
    /// The request did not complete. Nothing was saved.
    Transport,
}

/// A user-visible failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn from_error(err: &CoreError) -> Option<Self> {
        let kind = match err {
            CoreError::Application { .. } => NoticeKind::Application,
            CoreError::Transport { .. } | CoreError::LoadFailed { .. } => NoticeKind::Transport,
            _ => return None,
        };
        Some(Self {
            kind,
            message: err.to_string(),
        })
    }
}

/// Mediates every request to the console.
pub struct SyncClient<T> {
    transport: T,
    busy: BusyIndicator,
    notices: broadcast::Sender<Notice>,
}

impl<T: Transport> SyncClient<T> {
    pub fn new(transport: T) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            transport,
            busy: BusyIndicator::new(),
            notices,
        }
    }

    /// Send `params` to `endpoint` and return the success payload.
    ///
    /// `success: false` yields [`CoreError::Application`] carrying the
    /// console's message; anything that prevents a readable reply yields
    /// [`CoreError::Transport`]. Both are also published as notices.
    pub async fn call(
        &self,
        endpoint: Endpoint,
        params: &[(String, String)],
    ) -> Result<Value, CoreError> {
        let _busy = self.busy.begin();
        debug!(%endpoint, in_flight = self.busy.in_flight(), "dispatching");

        let result = match self.transport.send(endpoint, params).await {
            Ok(envelope) => envelope
                .into_result()
                .map_err(|message| CoreError::Application { message }),
            Err(e) => Err(CoreError::from(e)),
        };
        result.map_err(|err| self.report(endpoint.name(), err))
    }

    /// [`call`](Self::call), then decode the payload as `R`.
    ///
    /// A payload that does not decode is a transport failure: the reply
    /// cannot be trusted, so nothing is applied.
    pub async fn call_for<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(String, String)],
    ) -> Result<R, CoreError> {
        let value = self.call(endpoint, params).await?;
        serde_json::from_value(value).map_err(|e| {
            self.report(
                endpoint.name(),
                CoreError::Transport {
                    reason: format!("unreadable reply from {endpoint}: {e}"),
                },
            )
        })
    }

    /// Fetch the index listing payload.
    pub async fn fetch_index(&self, sort: SortOrder) -> Result<Value, CoreError> {
        let _busy = self.busy.begin();
        debug!(%sort, "loading index");

        let result = match self.transport.fetch_index(sort).await {
            Ok(envelope) => envelope
                .into_result()
                .map_err(|message| CoreError::Application { message }),
            Err(e) => Err(CoreError::from(e).into_load_failure()),
        };
        result.map_err(|err| self.report("index", err))
    }

    /// Publish a failure notice for an error surfaced outside `call`.
    pub fn report(&self, context: &str, err: CoreError) -> CoreError {
        warn!(context, error = %err, "request failed");
        if let Some(notice) = Notice::from_error(&err) {
            // Nobody listening is fine; the error is still returned.
            let _ = self.notices.send(notice);
        }
        err
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    /// Subscribe to user-visible failure notices.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
