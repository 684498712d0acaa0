//! # Telegram bot framework
//!
//! Transport-agnostic core (Handler, Bot, Message), the handler chain, teloxide adapters with a
//! dispatcher runner, base config, logging setup and graceful-shutdown primitives.

pub mod chain;
pub mod config;
pub mod core;
pub mod shutdown;
pub mod telegram;

pub use core::{
    init_tracing, parse_message_id, Bot, Chat, DbotError, Handler, HandlerResponse,
    MediaFlags, Message, MessageDirection, Result, ToCoreMessage, ToCoreUser, User,
};

pub use chain::HandlerChain;

pub use telegram::{
    build_teloxide_bot, run_dispatcher, TelegramBotAdapter, TelegramMessageWrapper,
    TelegramUserWrapper,
};

pub use config::{env_first_non_empty, env_non_empty, env_parse, BaseConfig};
pub use shutdown::{shutdown_channel, InFlightGuard, InFlightTracker, ShutdownSignal, ShutdownTrigger};
