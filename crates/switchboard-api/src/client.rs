// Console HTTP client
//
// Wraps `reqwest::Client` with mount-point URL construction, form
// encoding, CSRF header injection, and envelope parsing. The client does
// not interpret `success: false`; it hands the parsed envelope back so
// the sync layer can tell an application refusal from a transport failure.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::endpoint::Endpoint;
use crate::envelope::Envelope;
use crate::error::Error;
use crate::http::HttpSettings;

/// Header the console checks on every POST.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Raw HTTP client for the console's admin endpoints.
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: Url,
    csrf_token: Option<SecretString>,
    /// Known only when this client built `http` itself.
    timeout: Option<Duration>,
}

impl ConsoleClient {
    /// Create a console client with its own cookie-carrying HTTP client.
    ///
    /// `base_url` is the console mount point (e.g.
    /// `https://admin.example.com/nexus/switches/`); a missing trailing
    /// slash is added so relative endpoint paths resolve beneath it.
    pub fn new(base_url: Url, settings: &HttpSettings) -> Result<Self, Error> {
        let http = settings.build()?;
        Ok(Self {
            timeout: Some(settings.timeout),
            ..Self::with_client(http, base_url)
        })
    }

    /// Create a console client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            csrf_token: None,
            timeout: None,
        }
    }

    /// Attach a CSRF token sent with every POST.
    pub fn with_csrf_token(mut self, token: SecretString) -> Self {
        self.csrf_token = Some(token);
        self
    }

    /// The console mount point.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for an endpoint beneath the mount point.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        Ok(self.base_url.join(endpoint.path())?)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// POST a form-encoded parameter list to an endpoint.
    pub async fn post(
        &self,
        endpoint: Endpoint,
        form: &[(String, String)],
    ) -> Result<Envelope, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%endpoint, "POST {}", url);
        trace!(?form, "form parameters");

        let mut builder = self.http.post(url).form(form);
        if let Some(ref token) = self.csrf_token {
            builder = builder.header(CSRF_HEADER, token.expose_secret());
        }
        let resp = builder.send().await.map_err(|e| self.send_error(e))?;

        parse_envelope(resp).await
    }

    /// Fetch the index listing, sorted server-side by `sort`.
    ///
    /// The payload is `{"switches": [...], "all_conditions": [...]}`.
    pub async fn index(&self, sort: &str) -> Result<Envelope, Error> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("by", sort)
            .append_pair("format", "json");
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        parse_envelope(resp).await
    }

    fn send_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Parse the `{ success, data }` envelope.
///
/// Non-2xx statuses become [`Error::Http`] with a short body preview:
/// the console only produces envelopes on 200.
async fn parse_envelope(resp: reqwest::Response) -> Result<Envelope, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            body: preview(&body).to_owned(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ConsoleClient {
        ConsoleClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn base_without_slash_is_normalized() {
        let c = client("https://admin.example.com/nexus/switches");
        assert_eq!(c.base_url().path(), "/nexus/switches/");
        assert_eq!(
            c.endpoint_url(Endpoint::AddCondition).unwrap().as_str(),
            "https://admin.example.com/nexus/switches/conditions/add/"
        );
    }

    #[test]
    fn endpoint_urls_resolve_beneath_mount_point() {
        let c = client("https://admin.example.com/nexus/switches/");
        assert_eq!(
            c.endpoint_url(Endpoint::UpdateStatus).unwrap().as_str(),
            "https://admin.example.com/nexus/switches/status/"
        );
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        assert_eq!(preview(&long).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }
}
