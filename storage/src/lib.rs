//! Storage crate: conversation history and per-user LLM settings.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Conversation, MessageTurn, UserSettings, SettingsUpdate
//! - [`repository`] – ConversationRepository / UserSettingsRepository traits
//! - [`memory_store`] – in-process backend (tests, local runs)
//! - [`sqlite_store`] – SQLite backend over [`SqlitePoolManager`]
//! - [`mongo_store`] – MongoDB backend (`conversation_history`, `openai_config`)
//! - [`connect`] – picks a backend from the database URL

mod connect;
mod error;
mod memory_store;
mod models;
mod mongo_store;
mod repository;
mod sqlite_pool;
mod sqlite_store;

pub use connect::{connect, StoreKind};
pub use error::StorageError;
pub use memory_store::InMemoryStore;
pub use models::{
    Conversation, MessageTurn, SettingsUpdate, TurnRole, UserSettings, DEFAULT_GPT_MODEL,
    DEFAULT_PROMPT, DEFAULT_TEMPERATURE, MAX_TEMPERATURE, MIN_TEMPERATURE,
};
pub use mongo_store::MongoStore;
pub use repository::{ConversationRepository, Store, UserSettingsRepository};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteStore;
