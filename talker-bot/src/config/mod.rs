//! Bot configuration: BaseConfig (Telegram + log + DB), WebhookConfig (HTTP receiver) and the LLM
//! settings from `llm-client`.

mod base;
mod bot_config;
pub(crate) mod webhook;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use webhook::WebhookConfig;
