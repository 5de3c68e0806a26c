//! Shared mocks for talker-bot integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use llm_client::{CompletionOptions, LlmClient};
use prompt::ChatMessage;
use std::sync::{Arc, Mutex};
use storage::{
    Conversation, ConversationRepository, MessageTurn, SettingsUpdate, StorageError,
    UserSettings, UserSettingsRepository,
};
use talker_core::{Bot, Chat, Message, User};

pub const CHAT_ID: i64 = 1111111;
pub const USER_ID: i64 = 424242;

/// Records every outgoing message as (chat_id, text).
#[derive(Default)]
pub struct MockBot {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> talker_core::Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }
}

/// Returns a fixed reply (or an error) and records each request.
pub struct MockLlm {
    reply: Option<String>,
    pub calls: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
}

impl MockLlm {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> (Vec<ChatMessage>, CompletionOptions) {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no LLM call recorded")
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: &CompletionOptions,
    ) -> anyhow::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((messages, options.clone()));
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(anyhow::anyhow!("upstream returned 503")),
        }
    }
}

/// Store whose every operation fails, for error-path tests.
pub struct FailingStore;

fn unavailable() -> StorageError {
    StorageError::Database("database unavailable".to_string())
}

#[async_trait]
impl ConversationRepository for FailingStore {
    async fn get_conversation(&self, _chat_id: i64) -> Result<Option<Conversation>, StorageError> {
        Err(unavailable())
    }

    async fn append_turns(&self, _chat_id: i64, _turns: &[MessageTurn]) -> Result<(), StorageError> {
        Err(unavailable())
    }

    async fn reset_context(&self, _chat_id: i64) -> Result<(), StorageError> {
        Err(unavailable())
    }
}

#[async_trait]
impl UserSettingsRepository for FailingStore {
    async fn get_settings(&self, _user_id: &str) -> Result<Option<UserSettings>, StorageError> {
        Err(unavailable())
    }

    async fn reset_settings(&self, _user_id: &str) -> Result<UserSettings, StorageError> {
        Err(unavailable())
    }

    async fn update_settings(
        &self,
        _user_id: &str,
        _update: &SettingsUpdate,
    ) -> Result<UserSettings, StorageError> {
        Err(unavailable())
    }

    async fn delete_settings(&self, _user_id: &str) -> Result<bool, StorageError> {
        Err(unavailable())
    }
}

/// Incoming private text message from user "Ana" in [`CHAT_ID`].
pub fn text_message(text: &str) -> Message {
    message_in(CHAT_ID, text)
}

pub fn message_in(chat_id: i64, text: &str) -> Message {
    Message {
        id: "1365".to_string(),
        user: User {
            id: USER_ID,
            username: Some("ana_b".to_string()),
            first_name: Some("Ana".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: chat_id,
            chat_type: "private".to_string(),
        },
        content: text.to_string(),
        created_at: Utc::now(),
    }
}
