//! Models persisted by the storage backends.

mod conversation;
mod user_settings;

pub use conversation::{Conversation, MessageTurn, TurnRole};
pub use user_settings::{
    SettingsUpdate, UserSettings, DEFAULT_GPT_MODEL, DEFAULT_PROMPT, DEFAULT_TEMPERATURE,
    MAX_TEMPERATURE, MIN_TEMPERATURE,
};
