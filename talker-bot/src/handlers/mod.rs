//! Handlers run by the chain, in order: logging → command → conversation.

pub mod command;
pub mod conversation;
mod logging;

pub use command::{parse_command, Command, CommandHandler};
pub use conversation::{ConversationDefaults, ConversationHandler};
pub use logging::LoggingHandler;

use storage::StorageError;
use talker_core::BotError;

pub(crate) fn storage_error(e: StorageError) -> BotError {
    BotError::Database(e.to_string())
}
