//! Relay error taxonomy. Every failure stays inside the event that caused it; none of these
//! ever terminate the process.

use rewrite_client::RewriteError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// A required setting is absent. Reported to the user or logged; never fatal.
    #[error("{0} is not set")]
    ConfigMissing(&'static str),

    /// Every endpoint and attempt failed. The stored input is kept for a later retry.
    #[error("rewrite backend unavailable after {attempts} attempts")]
    BackendUnavailable { attempts: u32 },

    /// The backend produced blank text; blank text is never sent.
    #[error("rewrite backend returned an empty response")]
    EmptyBackendResponse,

    /// Probe or send to the destination failed; the send is suppressed.
    #[error("destination chat {0} does not accept messages")]
    DestinationUnreachable(i64),

    /// A watched channel stopped resolving; it is dropped from the active set.
    #[error("watched channel {channel_id} unavailable: {reason}")]
    TransientPeerError { channel_id: i64, reason: String },

    /// A watched channel could not be read this tick; it stays in the active set.
    #[error("channel source error: {0}")]
    SourceUnavailable(String),

    #[error("nothing to rewrite after cleanup")]
    NothingToRewrite,

    #[error("no stored text to revise")]
    NoStoredInput,

    #[error("invalid rewrite request: {0}")]
    InvalidRequest(String),
}

impl From<RewriteError> for RelayError {
    fn from(e: RewriteError) -> Self {
        match e {
            RewriteError::MissingApiKey => RelayError::ConfigMissing("REWRITE_API_KEY"),
            RewriteError::BackendUnavailable { attempts } => {
                RelayError::BackendUnavailable { attempts }
            }
            RewriteError::InvalidRequest(msg) => RelayError::InvalidRequest(msg),
        }
    }
}

impl RelayError {
    /// False for failures that repeat on every attempt with the same input; such posts are
    /// settled instead of being left for a retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            RelayError::NothingToRewrite | RelayError::InvalidRequest(_)
        )
    }

    /// Text shown to a user in chat.
    pub fn user_message(&self) -> String {
        match self {
            RelayError::ConfigMissing(name) => {
                format!("Rewriting is not configured: {} is not set.", name)
            }
            RelayError::BackendUnavailable { .. } => {
                "Rewrite service is unavailable right now. Please try again later.".to_string()
            }
            RelayError::EmptyBackendResponse => {
                "Got an empty response from the rewrite service. Try another model or check the settings."
                    .to_string()
            }
            RelayError::DestinationUnreachable(chat_id) => {
                format!("Cannot post to chat {}.", chat_id)
            }
            RelayError::NothingToRewrite => {
                "Nothing to rewrite: the text is empty after removing mentions.".to_string()
            }
            RelayError::NoStoredInput => {
                "No stored text yet. Get a rewrite first or send a text.".to_string()
            }
            RelayError::TransientPeerError { .. }
            | RelayError::SourceUnavailable(_)
            | RelayError::InvalidRequest(_) => {
                "Something went wrong, please try again.".to_string()
            }
        }
    }
}
