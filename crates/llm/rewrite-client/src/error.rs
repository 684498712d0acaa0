//! Error types for the rewrite client.

use thiserror::Error;

/// Failure of a whole rewrite call.
#[derive(Error, Debug)]
pub enum RewriteError {
    /// No API key configured; nothing was sent.
    #[error("REWRITE_API_KEY is not set")]
    MissingApiKey,

    /// Every endpoint used up its attempts without a non-empty reply.
    #[error("rewrite backend unavailable after {attempts} attempts")]
    BackendUnavailable { attempts: u32 },

    /// The request body could not be built from the configured parameters.
    #[error("invalid rewrite request: {0}")]
    InvalidRequest(String),
}

/// Failure of a single attempt against one endpoint (anything but 429).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),
}
