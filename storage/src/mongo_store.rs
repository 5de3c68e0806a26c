//! MongoDB backend.
//!
//! Collections `conversation_history` (one document per chat, turns pushed with `$push`) and
//! `openai_config` (one document per user).
//!
//! Older history documents are keyed by `telegram_user_id` (a string) instead of `chat_id`. In a
//! private chat the chat id equals the user id, so such a document is adopted on first access by
//! stamping it with `chat_id`.

use async_trait::async_trait;
use mongodb::bson::{doc, to_bson};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{Conversation, MessageTurn, SettingsUpdate, UserSettings};
use crate::repository::{ConversationRepository, UserSettingsRepository};

pub const CONVERSATION_COLLECTION: &str = "conversation_history";
pub const SETTINGS_COLLECTION: &str = "openai_config";

#[derive(Clone)]
pub struct MongoStore {
    conversations: Collection<Conversation>,
    settings: Collection<UserSettings>,
}

impl MongoStore {
    /// Connects and pings the server so a bad URL fails at startup.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database_name);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database = %database_name, "Connected to MongoDB");

        Ok(Self {
            conversations: db.collection(CONVERSATION_COLLECTION),
            settings: db.collection(SETTINGS_COLLECTION),
        })
    }
}

impl MongoStore {
    /// Stamps a user-keyed history document with `chat_id`. Only private chats (positive ids) can
    /// have one. Returns whether a document was adopted.
    async fn adopt_legacy_history(&self, chat_id: i64) -> Result<bool, StorageError> {
        if chat_id <= 0 {
            return Ok(false);
        }
        let result = self
            .conversations
            .update_one(
                doc! {
                    "telegram_user_id": chat_id.to_string(),
                    "chat_id": { "$exists": false },
                },
                doc! { "$set": { "chat_id": chat_id } },
            )
            .await?;
        if result.modified_count > 0 {
            info!(chat_id, "Adopted user-keyed conversation history");
        }
        Ok(result.modified_count > 0)
    }
}

#[async_trait]
impl ConversationRepository for MongoStore {
    async fn get_conversation(&self, chat_id: i64) -> Result<Option<Conversation>, StorageError> {
        let filter = doc! { "chat_id": chat_id };
        if let Some(conv) = self.conversations.find_one(filter.clone()).await? {
            return Ok(Some(conv));
        }
        if self.adopt_legacy_history(chat_id).await? {
            return Ok(self.conversations.find_one(filter).await?);
        }
        Ok(None)
    }

    async fn append_turns(&self, chat_id: i64, turns: &[MessageTurn]) -> Result<(), StorageError> {
        self.adopt_legacy_history(chat_id).await?;
        let turns = to_bson(turns)?;
        self.conversations
            .update_one(
                doc! { "chat_id": chat_id },
                doc! {
                    "$push": { "messages": { "$each": turns } },
                    "$setOnInsert": { "context_start": 0_i64 },
                },
            )
            .upsert(true)
            .await?;
        debug!(chat_id, "Appended turns");
        Ok(())
    }

    async fn reset_context(&self, chat_id: i64) -> Result<(), StorageError> {
        self.adopt_legacy_history(chat_id).await?;
        // Pipeline update: the marker is computed server-side from the array length.
        let pipeline = vec![doc! {
            "$set": {
                "context_start": { "$size": { "$ifNull": ["$messages", []] } }
            }
        }];
        self.conversations
            .update_one(doc! { "chat_id": chat_id }, pipeline)
            .upsert(true)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserSettingsRepository for MongoStore {
    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, StorageError> {
        Ok(self
            .settings
            .find_one(doc! { "telegram_user_id": user_id })
            .await?)
    }

    async fn reset_settings(&self, user_id: &str) -> Result<UserSettings, StorageError> {
        self.delete_settings(user_id).await?;
        let defaults = UserSettings::defaults_for(user_id);
        self.settings.insert_one(&defaults).await?;
        Ok(defaults)
    }

    async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<UserSettings, StorageError> {
        update.validate()?;

        let defaults = UserSettings::defaults_for(user_id);
        let mut set = doc! {};
        let mut set_on_insert = doc! {};

        match update.token.as_deref().filter(|s| !s.is_empty()) {
            Some(token) => set.insert("token", token),
            None => set_on_insert.insert("token", defaults.token.as_str()),
        };
        match update.gpt_model.as_deref().filter(|s| !s.is_empty()) {
            Some(model) => set.insert("gpt_model", model),
            None => set_on_insert.insert("gpt_model", defaults.gpt_model.as_str()),
        };
        match update.temperature {
            Some(t) => set.insert("temperature", t),
            None => set_on_insert.insert("temperature", defaults.temperature),
        };
        match update.prompt.as_deref().filter(|s| !s.is_empty()) {
            Some(prompt) => set.insert("prompt", prompt),
            None => set_on_insert.insert("prompt", defaults.prompt.as_str()),
        };

        let mut modifications = doc! {};
        if !set.is_empty() {
            modifications.insert("$set", set);
        }
        if !set_on_insert.is_empty() {
            modifications.insert("$setOnInsert", set_on_insert);
        }

        self.settings
            .find_one_and_update(doc! { "telegram_user_id": user_id }, modifications)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("settings for user {}", user_id)))
    }

    async fn delete_settings(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = self
            .settings
            .delete_many(doc! { "telegram_user_id": user_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
