//! Backend selection from `DATABASE_URL`.

use std::sync::Arc;

use tracing::info;

use crate::error::StorageError;
use crate::memory_store::InMemoryStore;
use crate::mongo_store::MongoStore;
use crate::repository::Store;
use crate::sqlite_store::SqliteStore;

/// Which backend a database URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
    Mongo,
}

impl StoreKind {
    /// `mongodb://` / `mongodb+srv://` → Mongo, `sqlite:` / `file:` → SQLite, `memory` (or empty) → Memory.
    pub fn from_url(database_url: &str) -> Result<Self, StorageError> {
        let url = database_url.trim();
        if url.is_empty() || url.eq_ignore_ascii_case("memory") {
            Ok(StoreKind::Memory)
        } else if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
            Ok(StoreKind::Mongo)
        } else if url.starts_with("sqlite:") || url.starts_with("file:") {
            Ok(StoreKind::Sqlite)
        } else {
            Err(StorageError::UnsupportedUrl(
                url.split("://").next().unwrap_or(url).to_string(),
            ))
        }
    }
}

/// Opens the backend `database_url` points at. `database_name` is only used by MongoDB.
pub async fn connect(database_url: &str, database_name: &str) -> Result<Arc<dyn Store>, StorageError> {
    let kind = StoreKind::from_url(database_url)?;
    info!(backend = ?kind, "Opening storage backend");

    let store: Arc<dyn Store> = match kind {
        StoreKind::Memory => Arc::new(InMemoryStore::new()),
        StoreKind::Sqlite => Arc::new(SqliteStore::new(database_url.trim()).await?),
        StoreKind::Mongo => Arc::new(MongoStore::connect(database_url.trim(), database_name).await?),
    };
    Ok(store)
}
