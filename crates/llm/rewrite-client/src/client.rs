//! [`RewriteClient`]: endpoint fallback and retry around a [`RewriteTransport`].

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::RewriteConfig;
use crate::error::{RewriteError, TransportError};
use crate::mask_token;
use crate::retry::{AttemptOutcome, RetryPolicy, RetryState, Step};
use crate::transport::{HttpTransport, RewriteTransport, TransportCall, TransportReply};

/// Rewrites a finished prompt. Object safe so handlers hold `Arc<dyn Rewriter>`.
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Returns non-empty rewritten text or an error; never an empty success.
    async fn rewrite(&self, prompt: &str) -> Result<String, RewriteError>;
}

/// Rewrite client over any transport.
#[derive(Clone)]
pub struct RewriteClient {
    transport: Arc<dyn RewriteTransport>,
    config: RewriteConfig,
    policy: RetryPolicy,
}

impl RewriteClient {
    pub fn new(transport: Arc<dyn RewriteTransport>, config: RewriteConfig) -> Self {
        let policy = config.retry_policy();
        Self {
            transport,
            config,
            policy,
        }
    }

    /// Builds a client over [`HttpTransport`] using the configured timeout.
    pub fn from_config(config: RewriteConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str) -> Result<CreateChatCompletionRequest, RewriteError> {
        let invalid = |e: async_openai::error::OpenAIError| RewriteError::InvalidRequest(e.to_string());
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(invalid)?;
        let messages: Vec<ChatCompletionRequestMessage> = vec![user.into()];
        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model.as_str())
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .seed(self.config.seed)
            .build()
            .map_err(invalid)?;
        Ok(request)
    }

    fn classify(endpoint: &str, reply: Result<TransportReply, TransportError>) -> AttemptOutcome {
        match reply {
            Ok(TransportReply::Content(content)) if content.trim().is_empty() => {
                warn!(endpoint = %endpoint, "Empty response from rewrite backend");
                AttemptOutcome::Empty
            }
            Ok(TransportReply::Content(content)) => AttemptOutcome::Content(content.trim().to_string()),
            Ok(TransportReply::RateLimited { retry_after }) => {
                warn!(endpoint = %endpoint, retry_after = ?retry_after, "Rewrite backend rate limited");
                AttemptOutcome::RateLimited(retry_after)
            }
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "Rewrite request failed");
                AttemptOutcome::Failed
            }
        }
    }
}

#[async_trait]
impl Rewriter for RewriteClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn rewrite(&self, prompt: &str) -> Result<String, RewriteError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RewriteError::MissingApiKey)?;
        let endpoints = &self.config.endpoints;
        if endpoints.is_empty() {
            return Err(RewriteError::BackendUnavailable { attempts: 0 });
        }
        let body = self.build_request(prompt)?;

        info!(
            model = %self.config.model,
            endpoints = endpoints.len(),
            api_key = %mask_token(api_key),
            "Rewrite request"
        );

        let mut state = RetryState::default();
        let mut attempts = 0u32;
        loop {
            let endpoint = endpoints[state.endpoint].as_str();
            attempts += 1;
            let call = TransportCall {
                endpoint,
                api_key,
                referrer_url: self.config.referrer_url.as_deref(),
                app_title: &self.config.app_title,
                body: &body,
            };
            let outcome = Self::classify(endpoint, self.transport.send(call).await);

            match state.advance(outcome, &self.policy, endpoints.len()) {
                Step::Done(content) => {
                    info!(endpoint = %endpoint, attempts, content_len = content.len(), "Rewrite succeeded");
                    return Ok(content);
                }
                Step::Attempt { next, wait } => {
                    if next.endpoint != state.endpoint {
                        warn!(endpoint = %endpoint, "Endpoint exhausted, falling back to next");
                    }
                    if !wait.is_zero() {
                        tokio::time::sleep(wait).await;
                    }
                    state = next;
                }
                Step::Exhausted => {
                    warn!(attempts, "All rewrite endpoints exhausted");
                    return Err(RewriteError::BackendUnavailable { attempts });
                }
            }
        }
    }
}
