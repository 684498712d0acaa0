//! Per-chat settings: style override and last submitted input.
//!
//! Volatile, process-lifetime state. Every operation takes the map lock once, so concurrent
//! handlers see last-write-wins semantics with no torn values.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

/// Most recent successfully rewritten input of a chat, kept for `/revise`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastInput {
    pub text: String,
    pub source: Option<String>,
}

/// Shared map type; injected so several stores can be built over the same state in tests.
pub type ChatMap<V> = Arc<RwLock<HashMap<i64, V>>>;

/// Chat id → style and chat id → last input. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct SettingsStore {
    styles: ChatMap<String>,
    last_inputs: ChatMap<LastInput>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maps(styles: ChatMap<String>, last_inputs: ChatMap<LastInput>) -> Self {
        Self {
            styles,
            last_inputs,
        }
    }

    pub async fn get_style(&self, chat_id: i64) -> Option<String> {
        self.styles.read().await.get(&chat_id).cloned()
    }

    /// Stores the trimmed style; `None` or a blank value clears it.
    pub async fn set_style(&self, chat_id: i64, style: Option<&str>) {
        let style = style.map(str::trim).filter(|s| !s.is_empty());
        let mut styles = self.styles.write().await;
        match style {
            Some(s) => {
                debug!(chat_id, style_len = s.len(), "Style set");
                styles.insert(chat_id, s.to_string());
            }
            None => {
                debug!(chat_id, "Style cleared");
                styles.remove(&chat_id);
            }
        }
    }

    pub async fn get_last_input(&self, chat_id: i64) -> Option<LastInput> {
        self.last_inputs.read().await.get(&chat_id).cloned()
    }

    pub async fn set_last_input(&self, chat_id: i64, text: &str, source: Option<&str>) {
        self.last_inputs.write().await.insert(
            chat_id,
            LastInput {
                text: text.to_string(),
                source: source.map(str::to_string),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_style_set_trim_and_clear() {
        let store = SettingsStore::new();
        assert_eq!(store.get_style(1).await, None);

        store.set_style(1, Some("  короче  ")).await;
        assert_eq!(store.get_style(1).await.as_deref(), Some("короче"));

        store.set_style(1, Some("")).await;
        assert_eq!(store.get_style(1).await, None);

        store.set_style(1, Some("x")).await;
        store.set_style(1, None).await;
        assert_eq!(store.get_style(1).await, None);
    }

    #[tokio::test]
    async fn test_last_input_round_trip_and_overwrite() {
        let store = SettingsStore::new();
        store.set_last_input(7, "А", None).await;
        assert_eq!(
            store.get_last_input(7).await,
            Some(LastInput {
                text: "А".to_string(),
                source: None
            })
        );

        store.set_last_input(7, "Б", Some("Канал")).await;
        let last = store.get_last_input(7).await.unwrap();
        assert_eq!(last.text, "Б");
        assert_eq!(last.source.as_deref(), Some("Канал"));
        assert_eq!(store.get_last_input(8).await, None);
    }

    /// **Test: Clones share state; concurrent writers leave one of the written values.**
    #[tokio::test]
    async fn test_concurrent_writes_last_write_wins() {
        let store = SettingsStore::new();
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.set_style(5, Some(&format!("style {}", i))).await;
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let style = store.get_style(5).await.unwrap();
        assert!(style.starts_with("style "));
    }
}
