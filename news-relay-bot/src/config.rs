//! Relay configuration: base Telegram config, rewrite backend, destination, watcher timings.

use std::time::Duration;

use anyhow::{Context, Result};
use rewrite_client::RewriteConfig;
use telegram_bot::{env_non_empty, env_parse, BaseConfig};

use crate::destination::Destination;
use crate::watcher::parse_watch_channels;

pub const DEFAULT_LOG_FILE: &str = "logs/news-relay-bot.log";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub base: BaseConfig,
    pub rewrite: RewriteConfig,
    pub destination: Destination,
    /// WATCH_CHANNELS, normalized.
    pub watch_channels: Vec<String>,
    /// POLL_INTERVAL_SECS
    pub poll_interval: Duration,
    /// RESTART_DELAY_SECS
    pub restart_delay: Duration,
    /// SHUTDOWN_GRACE_SECS
    pub shutdown_grace: Duration,
}

fn env_secs(name: &str, default: u64) -> Duration {
    Duration::from_secs(env_parse(name, default))
}

impl RelayConfig {
    /// Loads everything from the environment; `token` overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token, DEFAULT_LOG_FILE)?;
        base.validate().context("Invalid Telegram configuration")?;

        Ok(Self {
            base,
            rewrite: RewriteConfig::from_env(),
            destination: Destination::from_env(),
            watch_channels: parse_watch_channels(&env_non_empty("WATCH_CHANNELS").unwrap_or_default()),
            poll_interval: env_secs("POLL_INTERVAL_SECS", 30).max(Duration::from_secs(1)),
            restart_delay: env_secs("RESTART_DELAY_SECS", 10),
            shutdown_grace: env_secs("SHUTDOWN_GRACE_SECS", 60),
        })
    }
}
