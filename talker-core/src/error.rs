//! Error type for the bot core.

use thiserror::Error;

/// Failures that abort the handler chain. The webhook answers them with HTTP 500.
#[derive(Error, Debug)]
pub enum BotError {
    /// Storage backend failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Telegram Bot API failure.
    #[error("Bot error: {0}")]
    Bot(String),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
