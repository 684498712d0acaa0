//! # Rewrite backend client
//!
//! Sends one rewrite prompt to an OpenAI-compatible chat completion API (OpenRouter by default)
//! and returns the rewritten text.
//!
//! - [`RewriteClient`] walks an ordered endpoint list; each endpoint gets a fixed attempt budget.
//! - [`RetryState`] is the `(endpoint, attempt)` state machine deciding retry, wait and fallback.
//! - [`RewriteTransport`] is the network seam; [`HttpTransport`] is the reqwest implementation.
//! - [`Rewriter`] is the object-safe interface the bot depends on.
//!
//! Request body types come from `async-openai`; the response is parsed leniently because
//! compatible providers omit fields the official schema requires.

mod client;
mod config;
mod error;
mod retry;
mod transport;

pub use client::{RewriteClient, Rewriter};
pub use config::{RewriteConfig, DEFAULT_ENDPOINTS, DEFAULT_MODEL};
pub use error::{RewriteError, TransportError};
pub use retry::{AttemptOutcome, RetryPolicy, RetryState, Step};
pub use transport::{HttpTransport, RewriteTransport, TransportCall, TransportReply};

pub use async_openai::types::CreateChatCompletionRequest;

/// Masks an API key for logging: first 7 chars + "***" + last 4 chars.
/// Keys of 11 chars or fewer are fully masked. Counts characters, not bytes.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
