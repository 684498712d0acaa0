//! Dispatcher runner: converts teloxide messages and channel posts to core::Message and passes
//! them to the HandlerChain, one spawned task per update.

use crate::chain::HandlerChain;
use crate::core::ToCoreMessage;
use crate::shutdown::{InFlightTracker, ShutdownSignal};
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use super::adapters::TelegramMessageWrapper;

async fn dispatch_message(
    msg: teloxide::types::Message,
    chain: HandlerChain,
    tracker: InFlightTracker,
) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        chat_type = %core_msg.chat.chat_type,
        message_id = %core_msg.id,
        edited = core_msg.edited,
        content_len = core_msg.content.len(),
        "Received message"
    );

    let guard = tracker.start();
    tokio::spawn(async move {
        let _guard = guard;
        if let Err(e) = chain.handle(&core_msg).await {
            error!(error = %e, chat_id = core_msg.chat.id, "Handler chain failed");
        }
    });

    Ok(())
}

/// Runs long polling until the dispatcher stops or `shutdown` fires.
///
/// Handles `message`, `channel_post` and `edited_channel_post`; every other update kind is
/// ignored. Calls get_me() first and writes the username into `bot_username` for command
/// addressing.
#[instrument(skip_all)]
pub async fn run_dispatcher(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: Arc<RwLock<Option<String>>>,
    tracker: InFlightTracker,
    mut shutdown: ShutdownSignal,
) -> Result<()> {
    let me = bot.get_me().await?;
    if let Some(username) = &me.user.username {
        *bot_username.write().await = Some(username.clone());
        info!(username = %username, "Bot username set before dispatch");
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(dispatch_message))
        .branch(Update::filter_channel_post().endpoint(dispatch_message))
        .branch(Update::filter_edited_channel_post().endpoint(dispatch_message));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![handler_chain, tracker])
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "Ignoring unsupported update");
        })
        .build();

    tokio::select! {
        _ = dispatcher.dispatch() => info!("Dispatcher stopped"),
        _ = shutdown.wait() => info!("Shutdown requested, dispatcher stopping"),
    }

    Ok(())
}
