//! Rewrite pipeline: sanitize → prompt (+ chat style) → rewrite → source attribution.
//!
//! Reads the chat's style before composing the prompt and records the raw input as the chat's
//! last input after a successful rewrite.

use std::sync::Arc;

use rewrite_client::Rewriter;
use tracing::{info, instrument};

use crate::error::RelayError;
use crate::settings::SettingsStore;

/// Prefix of the instruction line added to the style by `/revise`.
pub const REVISION_LABEL: &str = "Editor revisions: ";

/// Stored style, a blank line, then the revision instruction. Without a stored style only the
/// instruction line remains.
pub fn compose_revision_style(stored_style: Option<&str>, instruction: &str) -> String {
    match stored_style.map(str::trim).filter(|s| !s.is_empty()) {
        Some(style) => format!("{}\n\n{}{}", style, REVISION_LABEL, instruction),
        None => format!("{}{}", REVISION_LABEL, instruction),
    }
}

pub struct RelayPipeline {
    rewriter: Arc<dyn Rewriter>,
    settings: SettingsStore,
}

impl RelayPipeline {
    pub fn new(rewriter: Arc<dyn Rewriter>, settings: SettingsStore) -> Self {
        Self { rewriter, settings }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Rewrites and stores `text` as the chat's last input. Used where the reply itself is the
    /// delivery (commands, private text).
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn process_inbound_text(
        &self,
        chat_id: i64,
        text: &str,
        source: Option<&str>,
    ) -> Result<String, RelayError> {
        let result = self.rewrite_inbound(chat_id, text, source).await?;
        self.remember_input(chat_id, text, source).await;
        Ok(result)
    }

    /// Rewrites `text` with the style stored for `chat_id` and appends the source label.
    /// Leaves the last input alone; the caller records it with
    /// [`remember_input`](Self::remember_input) once the result is delivered.
    pub async fn rewrite_inbound(
        &self,
        chat_id: i64,
        text: &str,
        source: Option<&str>,
    ) -> Result<String, RelayError> {
        let style = self.settings.get_style(chat_id).await;
        let result = self.rewrite(text, source, style.as_deref()).await?;
        info!(chat_id, result_len = result.len(), "Inbound text rewritten");
        Ok(result)
    }

    pub async fn remember_input(&self, chat_id: i64, text: &str, source: Option<&str>) {
        self.settings.set_last_input(chat_id, text, source).await;
    }

    #[instrument(skip(self, instruction))]
    pub async fn revise(&self, chat_id: i64, instruction: &str) -> Result<String, RelayError> {
        let last = self
            .settings
            .get_last_input(chat_id)
            .await
            .ok_or(RelayError::NoStoredInput)?;
        let stored_style = self.settings.get_style(chat_id).await;
        let style = compose_revision_style(stored_style.as_deref(), instruction.trim());
        self.rewrite(&last.text, last.source.as_deref(), Some(&style))
            .await
    }

    async fn rewrite(
        &self,
        raw_text: &str,
        source: Option<&str>,
        style: Option<&str>,
    ) -> Result<String, RelayError> {
        let cleaned = prompt::sanitize(raw_text);
        if cleaned.is_empty() {
            return Err(RelayError::NothingToRewrite);
        }
        let prompt = prompt::build_prompt(&cleaned, style);
        let rewritten = self.rewriter.rewrite(&prompt).await?;
        let rewritten = rewritten.trim();
        if rewritten.is_empty() {
            return Err(RelayError::EmptyBackendResponse);
        }
        Ok(prompt::attach_source(rewritten.to_string(), source))
    }
}
