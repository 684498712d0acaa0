//! Bot configuration shared by applications: Telegram connection, log file, env lookups.

mod base;
mod env;

pub use base::BaseConfig;
pub use env::{env_first_non_empty, env_non_empty, env_parse};
