//! Watched channels: handle parsing, the channel source seam, delivery ledger and poller.

mod bot_api;
mod handle;
mod ledger;
mod poller;
mod source;

pub use bot_api::{BotApiChannelSource, PostSnapshots};
pub use handle::{normalize_channel_handle, parse_watch_channels};
pub use ledger::DeliveryLedger;
pub use poller::{resolve_watch_set, PollReport, Poller, WatchSet};
pub use source::{ChannelSource, SourceError};
