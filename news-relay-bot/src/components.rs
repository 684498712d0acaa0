//! Component factory: wires the pipeline, relay and handlers. Isolates assembly from the runner.

use std::sync::Arc;

use anyhow::{Context, Result};
use rewrite_client::{mask_token, RewriteClient, Rewriter};
use telegram_bot::{build_teloxide_bot, Bot, HandlerChain, TelegramBotAdapter};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::config::RelayConfig;
use crate::destination::Destination;
use crate::handlers::{ChannelPostHandler, CommandHandler};
use crate::pipeline::RelayPipeline;
use crate::relay::ChannelRelay;
use crate::settings::SettingsStore;
use crate::watcher::{DeliveryLedger, PostSnapshots};

/// State that outlives bot restarts: per-chat settings, delivery ledger, post snapshots.
#[derive(Clone, Default)]
pub struct SharedState {
    pub settings: SettingsStore,
    pub ledger: DeliveryLedger,
    pub snapshots: PostSnapshots,
}

/// Transport-independent core. Tests build it over mock Bot and Rewriter implementations.
#[derive(Clone)]
pub struct RelayCore {
    pub bot: Arc<dyn Bot>,
    pub pipeline: Arc<RelayPipeline>,
    pub relay: Arc<ChannelRelay>,
    pub state: SharedState,
    pub destination: Destination,
    pub bot_username: Arc<RwLock<Option<String>>>,
}

impl RelayCore {
    pub fn new(
        bot: Arc<dyn Bot>,
        rewriter: Arc<dyn Rewriter>,
        state: SharedState,
        destination: Destination,
    ) -> Self {
        let pipeline = Arc::new(RelayPipeline::new(rewriter, state.settings.clone()));
        let relay = Arc::new(ChannelRelay::new(pipeline.clone(), bot.clone(), destination));
        Self {
            bot,
            pipeline,
            relay,
            state,
            destination,
            bot_username: Arc::new(RwLock::new(None)),
        }
    }

    /// Commands first, then channel posts; each handler passes on messages it does not own.
    pub fn handler_chain(&self) -> HandlerChain {
        HandlerChain::new()
            .add_handler(Arc::new(CommandHandler::new(
                self.pipeline.clone(),
                self.bot.clone(),
                self.destination,
                self.bot_username.clone(),
            )))
            .add_handler(Arc::new(ChannelPostHandler::new(
                self.relay.clone(),
                self.state.ledger.clone(),
                self.state.snapshots.clone(),
            )))
    }
}

/// Production components: teloxide bot plus the HTTP rewrite client.
pub struct RelayComponents {
    pub teloxide_bot: teloxide::Bot,
    pub core: RelayCore,
}

#[instrument(skip_all)]
pub fn build_components(config: &RelayConfig, state: SharedState) -> Result<RelayComponents> {
    let teloxide_bot = build_teloxide_bot(&config.base).context("Failed to build Telegram bot")?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    match config.rewrite.api_key.as_deref() {
        Some(key) => info!(
            api_key = %mask_token(key),
            model = %config.rewrite.model,
            endpoints = config.rewrite.endpoints.len(),
            "Rewrite backend configured"
        ),
        None => warn!("REWRITE_API_KEY is not set; rewrites will be refused"),
    }
    let rewriter: Arc<dyn Rewriter> = Arc::new(
        RewriteClient::from_config(config.rewrite.clone())
            .context("Failed to build rewrite client")?,
    );

    Ok(RelayComponents {
        teloxide_bot,
        core: RelayCore::new(bot, rewriter, state, config.destination),
    })
}
