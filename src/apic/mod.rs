//! APIC REST client.
//!
//! Provides the session lifecycle (login, GET, POST, logout), class query
//! URL construction, and decoding of the `imdata` response envelope.

pub mod query;
pub mod response;
pub mod session;

pub use query::{mo_path, ClassQuery};
pub use response::ImData;
pub use session::{Session, SessionSettings};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the APIC.
#[derive(Debug, Error)]
pub enum ApicError {
    #[error("invalid APIC URL '{0}' (expected http:// or https://)")]
    InvalidUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("login failed for user '{user}': {reason}")]
    Login { user: String, reason: String },
    #[error("APIC returned {status} for {path}: {text}")]
    Status {
        status: StatusCode,
        path: String,
        /// APIC error code from the `error` object, when there is one.
        code: Option<String>,
        text: String,
    },
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
