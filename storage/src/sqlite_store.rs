//! SQLite backend.
//!
//! Tables: `conversations` (chat_id, context_start), `conversation_turns` (ordered by an autoincrement
//! id, never updated or deleted) and `user_settings`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{Conversation, MessageTurn, SettingsUpdate, TurnRole, UserSettings};
use crate::repository::{ConversationRepository, UserSettingsRepository};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteStore {
    pool_manager: SqlitePoolManager,
}

#[derive(sqlx::FromRow)]
struct TurnRow {
    role: String,
    text: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<TurnRow> for MessageTurn {
    type Error = StorageError;

    fn try_from(row: TurnRow) -> Result<Self, Self::Error> {
        let role: TurnRole = row.role.parse().map_err(StorageError::Serialization)?;
        Ok(MessageTurn {
            role,
            text: row.text,
            timestamp: row.timestamp,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    telegram_user_id: String,
    token: String,
    gpt_model: String,
    temperature: f64,
    prompt: String,
}

impl From<SettingsRow> for UserSettings {
    fn from(row: SettingsRow) -> Self {
        UserSettings {
            telegram_user_id: row.telegram_user_id,
            token: row.token,
            gpt_model: row.gpt_model,
            temperature: row.temperature,
            prompt: row.prompt,
        }
    }
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                chat_id INTEGER PRIMARY KEY,
                context_start INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversation_turns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL,
                role TEXT NOT NULL,
                text TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversation_turns_chat_id ON conversation_turns(chat_id)",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_settings (
                telegram_user_id TEXT PRIMARY KEY,
                token TEXT NOT NULL,
                gpt_model TEXT NOT NULL,
                temperature REAL NOT NULL,
                prompt TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    async fn write_settings(&self, settings: &UserSettings) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (telegram_user_id, token, gpt_model, temperature, prompt)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(telegram_user_id) DO UPDATE SET
                token = excluded.token,
                gpt_model = excluded.gpt_model,
                temperature = excluded.temperature,
                prompt = excluded.prompt
            "#,
        )
        .bind(&settings.telegram_user_id)
        .bind(&settings.token)
        .bind(&settings.gpt_model)
        .bind(settings.temperature)
        .bind(&settings.prompt)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ConversationRepository for SqliteStore {
    async fn get_conversation(&self, chat_id: i64) -> Result<Option<Conversation>, StorageError> {
        let pool = self.pool_manager.pool();

        let context_start: Option<(i64,)> =
            sqlx::query_as("SELECT context_start FROM conversations WHERE chat_id = ?")
                .bind(chat_id)
                .fetch_optional(pool)
                .await?;
        let Some((context_start,)) = context_start else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, TurnRow>(
            "SELECT role, text, timestamp FROM conversation_turns WHERE chat_id = ? ORDER BY id ASC",
        )
        .bind(chat_id)
        .fetch_all(pool)
        .await?;

        let messages = rows
            .into_iter()
            .map(MessageTurn::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Conversation {
            chat_id,
            messages,
            context_start: u32::try_from(context_start)
                .map_err(|_| StorageError::InvalidValue(format!("context_start {}", context_start)))?,
        }))
    }

    async fn append_turns(&self, chat_id: i64, turns: &[MessageTurn]) -> Result<(), StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query("INSERT INTO conversations (chat_id, context_start) VALUES (?, 0) ON CONFLICT(chat_id) DO NOTHING")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        for turn in turns {
            sqlx::query(
                "INSERT INTO conversation_turns (chat_id, role, text, timestamp) VALUES (?, ?, ?, ?)",
            )
            .bind(chat_id)
            .bind(turn.role.as_str())
            .bind(&turn.text)
            .bind(turn.timestamp)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(chat_id, appended = turns.len(), "Appended turns");
        Ok(())
    }

    async fn reset_context(&self, chat_id: i64) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (chat_id, context_start)
            VALUES (?, (SELECT COUNT(*) FROM conversation_turns WHERE chat_id = ?))
            ON CONFLICT(chat_id) DO UPDATE SET context_start = excluded.context_start
            "#,
        )
        .bind(chat_id)
        .bind(chat_id)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserSettingsRepository for SqliteStore {
    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, StorageError> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT telegram_user_id, token, gpt_model, temperature, prompt FROM user_settings WHERE telegram_user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(row.map(UserSettings::from))
    }

    async fn reset_settings(&self, user_id: &str) -> Result<UserSettings, StorageError> {
        let defaults = UserSettings::defaults_for(user_id);
        self.write_settings(&defaults).await?;
        Ok(defaults)
    }

    async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<UserSettings, StorageError> {
        update.validate()?;
        let mut settings = self
            .get_settings(user_id)
            .await?
            .unwrap_or_else(|| UserSettings::defaults_for(user_id));
        settings.apply(update);
        self.write_settings(&settings).await?;
        Ok(settings)
    }

    async fn delete_settings(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM user_settings WHERE telegram_user_id = ?")
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
