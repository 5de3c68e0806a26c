//! In-memory backend: maps behind tokio RwLocks. Used by tests and `DATABASE_URL=memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;
use crate::models::{Conversation, MessageTurn, SettingsUpdate, UserSettings};
use crate::repository::{ConversationRepository, UserSettingsRepository};

#[derive(Default)]
pub struct InMemoryStore {
    conversations: RwLock<HashMap<i64, Conversation>>,
    settings: RwLock<HashMap<String, UserSettings>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn get_conversation(&self, chat_id: i64) -> Result<Option<Conversation>, StorageError> {
        Ok(self.conversations.read().await.get(&chat_id).cloned())
    }

    async fn append_turns(&self, chat_id: i64, turns: &[MessageTurn]) -> Result<(), StorageError> {
        let mut conversations = self.conversations.write().await;
        let conv = conversations
            .entry(chat_id)
            .or_insert_with(|| Conversation::new(chat_id));
        conv.messages.extend_from_slice(turns);
        debug!(chat_id, total = conv.messages.len(), "Appended turns");
        Ok(())
    }

    async fn reset_context(&self, chat_id: i64) -> Result<(), StorageError> {
        let mut conversations = self.conversations.write().await;
        let conv = conversations
            .entry(chat_id)
            .or_insert_with(|| Conversation::new(chat_id));
        conv.context_start = u32::try_from(conv.messages.len())
            .map_err(|_| StorageError::InvalidValue("conversation too long".to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl UserSettingsRepository for InMemoryStore {
    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, StorageError> {
        Ok(self.settings.read().await.get(user_id).cloned())
    }

    async fn reset_settings(&self, user_id: &str) -> Result<UserSettings, StorageError> {
        let defaults = UserSettings::defaults_for(user_id);
        self.settings
            .write()
            .await
            .insert(user_id.to_string(), defaults.clone());
        Ok(defaults)
    }

    async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<UserSettings, StorageError> {
        update.validate()?;
        let mut settings = self.settings.write().await;
        let entry = settings
            .entry(user_id.to_string())
            .or_insert_with(|| UserSettings::defaults_for(user_id));
        entry.apply(update);
        Ok(entry.clone())
    }

    async fn delete_settings(&self, user_id: &str) -> Result<bool, StorageError> {
        Ok(self.settings.write().await.remove(user_id).is_some())
    }
}
