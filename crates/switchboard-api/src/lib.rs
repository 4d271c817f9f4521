//! Async HTTP client for the feature switch console.
//!
//! The console exposes six form-encoded POST endpoints plus an index
//! listing. Every reply is a `{"success": bool, "data": ...}` envelope,
//! returned here as an [`Envelope`] without interpretation.

pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;

pub use client::ConsoleClient;
pub use endpoint::Endpoint;
pub use envelope::Envelope;
pub use error::Error;
pub use http::{HttpSettings, TlsMode};
