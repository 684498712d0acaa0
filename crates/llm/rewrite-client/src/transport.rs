//! Network seam for the rewrite client and its reqwest implementation.

use async_openai::types::CreateChatCompletionRequest;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::error::TransportError;

/// Everything one attempt needs: where to send, credentials, body.
#[derive(Debug, Clone, Copy)]
pub struct TransportCall<'a> {
    pub endpoint: &'a str,
    pub api_key: &'a str,
    /// Sent as `HTTP-Referer` when set.
    pub referrer_url: Option<&'a str>,
    /// Sent as `X-Title`.
    pub app_title: &'a str,
    pub body: &'a CreateChatCompletionRequest,
}

/// Successful exchange with the backend. Errors other than 429 are [`TransportError`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransportReply {
    /// First choice's message content, trimmed. May be empty.
    Content(String),
    /// HTTP 429 with the parsed `Retry-After` header, if any.
    RateLimited { retry_after: Option<Duration> },
}

/// Performs one attempt against one endpoint.
#[async_trait]
pub trait RewriteTransport: Send + Sync {
    async fn send(&self, call: TransportCall<'_>) -> Result<TransportReply, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// reqwest transport with a per-request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// Uses an existing client (timeouts are the client's own).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Parses `Retry-After` given in (possibly fractional) seconds. HTTP-date values are ignored.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds = headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Some(Duration::ZERO);
    }
    Some(Duration::from_secs_f64(seconds.min(86_400.0)))
}

#[async_trait]
impl RewriteTransport for HttpTransport {
    async fn send(&self, call: TransportCall<'_>) -> Result<TransportReply, TransportError> {
        let mut request = self
            .client
            .post(call.endpoint)
            .bearer_auth(call.api_key)
            .header("X-Title", call.app_title)
            .json(call.body);
        if let Some(referrer) = call.referrer_url {
            request = request.header("HTTP-Referer", referrer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(TransportReply::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
            .trim()
            .to_string();
        Ok(TransportReply::Content(content))
    }
}
