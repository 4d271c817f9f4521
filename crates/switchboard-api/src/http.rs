// ── HTTP client construction ──
//
// The console sets its CSRF cookie on the index page and checks it against
// the `X-CSRFToken` header on every POST, so every client keeps a cookie
// store for its whole lifetime.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::Error;

/// How the console's certificate is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    #[default]
    System,
    /// Trust the PEM certificate at this path in addition to the system store.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed staging consoles).
    DangerAcceptInvalid,
}

/// Connection settings for a [`ConsoleClient`](crate::ConsoleClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub tls: TlsMode,
    /// Whole-request deadline, connect through body.
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpSettings {
    pub(crate) fn build(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .cookie_provider(Arc::new(Jar::default()))
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")));

        let builder = match &self.tls {
            TlsMode::System => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("cannot build HTTP client: {e}")))
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA certificate {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_build() {
        assert!(HttpSettings::default().build().is_ok());
    }

    #[test]
    fn missing_ca_file_is_a_tls_error_naming_the_path() {
        let settings = HttpSettings {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/switchboard-ca.pem")),
            ..HttpSettings::default()
        };
        let Err(Error::Tls(msg)) = settings.build() else {
            panic!("expected a TLS error");
        };
        assert!(msg.contains("/nonexistent/switchboard-ca.pem"), "{msg}");
    }
}
