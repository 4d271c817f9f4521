// ── Runtime connection configuration ──
//
// These types describe *how* to reach a console. They carry the CSRF
// token and connection tuning, but never touch disk. The CLI constructs
// a `ConsoleConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use switchboard_api::{HttpSettings, TlsMode};
use url::Url;

use crate::model::SortOrder;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging consoles).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for talking to a single console.
///
/// Built by the CLI, passed to `Console::connect`. Core never reads
/// config files.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// The console's mount point, e.g. `https://admin.example.com/nexus/switches/`.
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Sent as `X-CSRFToken` on every mutation, when the console wants one.
    pub csrf_token: Option<SecretString>,
    /// Order used by `load` when the caller does not pick one.
    pub sort: SortOrder,
}

impl ConsoleConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            csrf_token: None,
            sort: SortOrder::default(),
        }
    }

    /// Connection settings for the HTTP client.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}
