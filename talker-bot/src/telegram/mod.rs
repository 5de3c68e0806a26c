//! Telegram transport: teloxide ↔ talker-core adapters, update decoding and Bot API calls.

mod adapters;
mod api;
mod bot_adapter;
mod update;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use api::{build_teloxide_bot, delete_webhook, fetch_bot_username, register_webhook};
pub use bot_adapter::TelegramBotAdapter;
pub use update::{decode_update, incoming_text_message, to_core_message};
