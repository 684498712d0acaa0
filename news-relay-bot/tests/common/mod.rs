//! Test doubles shared by integration tests: a recording Bot, a scripted Rewriter, and message
//! builders.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use news_relay_bot::{Destination, RelayCore, SharedState};
use rewrite_client::{RewriteError, Rewriter};
use telegram_bot::{Bot, Chat, MediaFlags, Message, MessageDirection, User};

/// Records sends, replies and probes. Chats in `unreachable` fail the probe and every send;
/// chats in `failing_sends` pass the probe but reject sends.
#[derive(Default)]
pub struct RecordingBot {
    pub sent: Mutex<Vec<(i64, String)>>,
    pub probes: Mutex<Vec<i64>>,
    pub unreachable: Mutex<HashSet<i64>>,
    pub failing_sends: Mutex<HashSet<i64>>,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_unreachable(ids: &[i64]) -> Arc<Self> {
        let bot = Self::default();
        bot.unreachable.lock().unwrap().extend(ids.iter().copied());
        Arc::new(bot)
    }

    pub fn with_failing_sends(ids: &[i64]) -> Arc<Self> {
        let bot = Self::default();
        bot.failing_sends.lock().unwrap().extend(ids.iter().copied());
        Arc::new(bot)
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn probes(&self) -> Vec<i64> {
        self.probes.lock().unwrap().clone()
    }

    fn deliver(&self, chat_id: i64, text: &str) -> telegram_bot::Result<()> {
        if self.unreachable.lock().unwrap().contains(&chat_id) {
            return Err(telegram_bot::DbotError::Bot("Forbidden: bot was blocked".to_string()));
        }
        if self.failing_sends.lock().unwrap().contains(&chat_id) {
            return Err(telegram_bot::DbotError::Bot("Bad Request: message is too long".to_string()));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> telegram_bot::Result<()> {
        self.deliver(chat.id, text)
    }

    async fn reply_to(&self, message: &Message, text: &str) -> telegram_bot::Result<()> {
        self.deliver(message.chat.id, text)
    }

    async fn can_send(&self, chat: &Chat) -> bool {
        self.probes.lock().unwrap().push(chat.id);
        !self.unreachable.lock().unwrap().contains(&chat.id)
    }
}

/// One scripted rewrite result.
#[derive(Clone, Debug)]
pub enum Scripted {
    Text(String),
    /// Answers after the given (tokio) delay.
    Delayed(Duration, String),
    Unavailable,
    MissingKey,
}

/// Replays scripted results (the last one repeats) and records every prompt.
pub struct StubRewriter {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Scripted>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubRewriter {
    pub fn replying(text: &str) -> Arc<Self> {
        Self::scripted(vec![Scripted::Text(text.to_string())])
    }

    pub fn scripted(script: Vec<Scripted>) -> Arc<Self> {
        let last = script
            .last()
            .cloned()
            .unwrap_or(Scripted::Text("rewritten".to_string()));
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(last),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Rewriter for StubRewriter {
    async fn rewrite(&self, prompt: &str) -> Result<String, RewriteError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.lock().unwrap().clone());
        match next {
            Scripted::Text(text) => Ok(text),
            Scripted::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Scripted::Unavailable => Err(RewriteError::BackendUnavailable { attempts: 12 }),
            Scripted::MissingKey => Err(RewriteError::MissingApiKey),
        }
    }
}

pub fn core_with(
    bot: Arc<RecordingBot>,
    rewriter: Arc<StubRewriter>,
    destination: Option<i64>,
) -> RelayCore {
    RelayCore::new(
        bot,
        rewriter,
        SharedState::default(),
        Destination::new(destination),
    )
}

fn base_message(chat: Chat, id: i32, text: &str) -> Message {
    Message {
        id: id.to_string(),
        user: User::default(),
        chat,
        content: text.to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        edited: false,
        media: MediaFlags::default(),
        reply_to_message_id: None,
        reply_to_message_content: None,
    }
}

pub fn private_message(chat_id: i64, text: &str) -> Message {
    let mut msg = base_message(
        Chat {
            id: chat_id,
            chat_type: "private".to_string(),
            title: None,
        },
        1,
        text,
    );
    msg.user = User {
        id: chat_id,
        username: Some("editor".to_string()),
        first_name: Some("Editor".to_string()),
        last_name: None,
    };
    msg
}

pub fn private_reply(chat_id: i64, text: &str, replied_text: &str) -> Message {
    let mut msg = private_message(chat_id, text);
    msg.reply_to_message_id = Some("0".to_string());
    msg.reply_to_message_content = Some(replied_text.to_string());
    msg
}

pub fn channel_message(channel_id: i64, message_id: i32, title: &str, text: &str) -> Message {
    base_message(
        Chat {
            id: channel_id,
            chat_type: "channel".to_string(),
            title: Some(title.to_string()),
        },
        message_id,
        text,
    )
}
