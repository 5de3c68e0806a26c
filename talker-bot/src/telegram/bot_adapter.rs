//! Wraps teloxide::Bot and implements [`talker_core::Bot`]. Production code sends messages via
//! Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use talker_core::{Bot as CoreBot, BotError, Chat, Result};
use teloxide::{prelude::*, types::ChatId};
use tracing::debug;

/// Telegram rejects longer `sendMessage` texts.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Thin wrapper around teloxide::Bot that implements talker-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, preferring to cut after a newline.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest: Vec<char> = text.chars().collect();
    while rest.len() > max_chars {
        let window = &rest[..max_chars];
        let cut = window
            .iter()
            .rposition(|c| *c == '\n')
            .filter(|&i| i > 0)
            .map(|i| i + 1)
            .unwrap_or(max_chars);
        parts.push(rest[..cut].iter().collect());
        rest.drain(..cut);
    }
    if !rest.is_empty() || parts.is_empty() {
        parts.push(rest.into_iter().collect());
    }
    parts
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        let parts = split_message(text, MAX_MESSAGE_CHARS);
        debug!(chat_id = chat.id, parts = parts.len(), "Sending message");
        for part in parts {
            self.bot
                .send_message(ChatId(chat.id), part)
                .await
                .map_err(|e| BotError::Bot(e.to_string()))?;
        }
        Ok(())
    }
}
