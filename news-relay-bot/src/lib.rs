//! # news_relay_bot
//!
//! Watches Telegram channels, rewrites their posts with an LLM in the chat's editorial style and
//! republishes them to a destination chat. Also serves /paraphrase, /style and /revise commands.
//!
//! Entry point: [`run_relay_bot`]. [`RelayCore`] assembles the same handler chain over any
//! [`telegram_bot::Bot`] and [`rewrite_client::Rewriter`] for tests.

pub mod cli;
pub mod components;
pub mod config;
pub mod destination;
pub mod error;
pub mod handlers;
pub mod media;
pub mod pipeline;
pub mod relay;
pub mod runner;
pub mod settings;
pub mod supervisor;
pub mod watcher;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_components, RelayComponents, RelayCore, SharedState};
pub use config::RelayConfig;
pub use destination::Destination;
pub use error::RelayError;
pub use pipeline::{compose_revision_style, RelayPipeline};
pub use relay::{ChannelPost, ChannelRelay};
pub use runner::run_relay_bot;
pub use settings::{LastInput, SettingsStore};
