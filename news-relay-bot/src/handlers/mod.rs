//! Chain handlers: commands for people, channel posts for channels.

pub mod channel_post;
pub mod command;

pub use channel_post::ChannelPostHandler;
pub use command::{parse_command, CommandHandler, ParsedCommand};
