// ── Transport seam ──
//
// The sync layer talks to the console through this trait so the engine
// can run against the real HTTP client or an in-memory stand-in.

use std::future::Future;

use switchboard_api::{ConsoleClient, Endpoint, Envelope};

use crate::model::SortOrder;

/// Sends requests to the remote authority and returns its raw envelope.
pub trait Transport: Send + Sync + 'static {
    /// POST a form-encoded request to `endpoint`.
    fn send(
        &self,
        endpoint: Endpoint,
        form: &[(String, String)],
    ) -> impl Future<Output = Result<Envelope, switchboard_api::Error>> + Send;

    /// Fetch the index listing in the given order.
    fn fetch_index(
        &self,
        sort: SortOrder,
    ) -> impl Future<Output = Result<Envelope, switchboard_api::Error>> + Send;
}

impl Transport for ConsoleClient {
    async fn send(
        &self,
        endpoint: Endpoint,
        form: &[(String, String)],
    ) -> Result<Envelope, switchboard_api::Error> {
        self.post(endpoint, form).await
    }

    async fn fetch_index(&self, sort: SortOrder) -> Result<Envelope, switchboard_api::Error> {
        self.index(&sort.to_string()).await
    }
}
