//! Base config: Telegram Bot connection and logging. Loaded from env.

use anyhow::Result;

use super::env::{env_first_non_empty, env_non_empty};

/// Telegram connectivity and logging settings shared by every bot built on this crate.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN or TELEGRAM_BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided;
    /// `default_log_file` is used when LOG_FILE is unset.
    pub fn load(token: Option<String>, default_log_file: &str) -> Result<Self> {
        let bot_token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| env_first_non_empty(&["BOT_TOKEN", "TELEGRAM_BOT_TOKEN"]))
            .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN not set (pass --token or set BOT_TOKEN)"))?;
        let telegram_api_url = env_first_non_empty(&["TELEGRAM_API_URL", "TELOXIDE_API_URL"]);
        let log_file = env_non_empty("LOG_FILE").unwrap_or_else(|| default_log_file.to_string());

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
        })
    }

    /// Validate config (telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}
