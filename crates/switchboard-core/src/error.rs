// ── Core error types ──
//
// User-facing errors from switchboard-core. These are NOT API-specific:
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<switchboard_api::Error>` impl folds every transport-layer
// failure into the single "not saved" category.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote outcomes ──────────────────────────────────────────────
    /// The console answered `success: false`. The message is shown verbatim.
    #[error("{message}")]
    Application { message: String },

    /// The request could not complete, or its reply was unreadable.
    #[error("Your changes were not saved: {reason}")]
    Transport { reason: String },

    /// Same as `Transport`, for a read that changes nothing.
    #[error("Could not load switches: {reason}")]
    LoadFailed { reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Switch not found: {key}")]
    SwitchNotFound { key: String },

    #[error("Unknown condition field: {field}")]
    UnknownField { field: String },

    #[error("Invalid field path '{raw}': expected 'namespace,name'")]
    InvalidFieldPath { raw: String },

    #[error("Invalid status: {value}")]
    InvalidStatus { value: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures where nothing reached the console's
    /// state (or we cannot tell that it did).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::LoadFailed { .. })
    }

    /// Re-label a transport failure as a failed read.
    #[must_use]
    pub fn into_load_failure(self) -> Self {
        match self {
            Self::Transport { reason } => Self::LoadFailed { reason },
            other => other,
        }
    }

    /// Returns `true` when the console explicitly refused the request.
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<switchboard_api::Error> for CoreError {
    fn from(err: switchboard_api::Error) -> Self {
        match err {
            switchboard_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            switchboard_api::Error::Timeout { timeout_secs } => CoreError::Transport {
                reason: format!("request timed out after {timeout_secs}s"),
            },
            switchboard_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Transport {
                reason: "request timed out".into(),
            },
            switchboard_api::Error::Transport(ref e) if e.is_connect() => CoreError::Transport {
                reason: format!("could not reach console: {e}"),
            },
            other => CoreError::Transport {
                reason: other.to_string(),
            },
        }
    }
}
