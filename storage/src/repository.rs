//! Repository traits implemented by every backend.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{Conversation, MessageTurn, SettingsUpdate, UserSettings};

/// Conversation history keyed by chat id. Stored turns are append-only.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Returns the conversation, or `None` if the chat has never written a turn or reset.
    async fn get_conversation(&self, chat_id: i64) -> Result<Option<Conversation>, StorageError>;

    /// Appends `turns` in order as one write, creating the conversation if needed.
    async fn append_turns(&self, chat_id: i64, turns: &[MessageTurn]) -> Result<(), StorageError>;

    /// Moves the context marker to the current end of the history.
    async fn reset_context(&self, chat_id: i64) -> Result<(), StorageError>;
}

/// Per-user LLM settings keyed by Telegram user id.
#[async_trait]
pub trait UserSettingsRepository: Send + Sync {
    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, StorageError>;

    /// Drops any stored settings and writes the defaults.
    async fn reset_settings(&self, user_id: &str) -> Result<UserSettings, StorageError>;

    /// Applies a partial update, starting from defaults when nothing is stored.
    /// Out-of-range temperatures are rejected with [`StorageError::InvalidValue`].
    async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<UserSettings, StorageError>;

    /// Returns true if something was deleted.
    async fn delete_settings(&self, user_id: &str) -> Result<bool, StorageError>;
}

/// A backend providing both repositories.
pub trait Store: ConversationRepository + UserSettingsRepository {}

impl<T: ConversationRepository + UserSettingsRepository> Store for T {}
