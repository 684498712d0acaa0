//! Destination chat resolution.
//!
//! Candidates in order: `DEST_CHAT_ID`, legacy `DEST_USER_ID`, `TARGET_CHAT_ID`. The first value
//! that parses as an integer wins. Disagreeing values are kept working but logged.

use telegram_bot::env_non_empty;
use tracing::{info, warn};

/// Resolved destination; `None` when no candidate parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Destination {
    chat_id: Option<i64>,
}

pub const DESTINATION_VARS: [&str; 3] = ["DEST_CHAT_ID", "DEST_USER_ID", "TARGET_CHAT_ID"];

impl Destination {
    pub fn new(chat_id: Option<i64>) -> Self {
        Self { chat_id }
    }

    pub fn from_env() -> Self {
        let values: Vec<(&str, Option<String>)> = DESTINATION_VARS
            .iter()
            .map(|name| (*name, env_non_empty(name)))
            .collect();
        Self::resolve(&values)
    }

    /// Resolves from `(variable, value)` pairs given in precedence order.
    pub fn resolve(candidates: &[(&str, Option<String>)]) -> Self {
        let mut chosen: Option<(&str, i64)> = None;
        for (name, raw) in candidates {
            let Some(raw) = raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            match raw.parse::<i64>() {
                Ok(id) => match chosen {
                    None => chosen = Some((*name, id)),
                    Some((winner, winner_id)) if winner_id != id => {
                        warn!(
                            chosen = winner,
                            chosen_id = winner_id,
                            ignored = *name,
                            ignored_id = id,
                            "Destination variables disagree; using the first"
                        );
                    }
                    Some(_) => {}
                },
                Err(_) => warn!(variable = *name, value = raw, "Destination is not an integer chat id"),
            }
        }
        if let Some((name, id)) = chosen {
            info!(variable = name, chat_id = id, "Destination resolved");
        }
        Self {
            chat_id: chosen.map(|(_, id)| id),
        }
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.chat_id
    }

    /// Configured destination, else `default`.
    pub fn target_or(&self, default: Option<i64>) -> Option<i64> {
        self.chat_id.or(default)
    }
}
