//! # Talker bot application
//!
//! Telegram webhook → handler chain (logging, commands, conversation) → LLM → storage → reply.
//! Wires talker-core, handler-chain, storage, prompt and llm-client; loads config from env and
//! serves the webhook with axum.

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;
pub mod telegram;
pub mod webhook;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::BotConfig;
pub use runner::{remove_webhook, run_bot, set_webhook};
pub use talker_core::{Bot, Chat, Handler, HandlerResponse, Message, User};
pub use webhook::{router, WebhookState};
