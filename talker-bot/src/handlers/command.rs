//! Bot commands: /start, /help, /token, /reset, /model, /temperature.
//!
//! Non-command text passes through (Continue). Commands addressed to another bot
//! (`/start@other_bot`) and unknown commands stop the chain without a reply.

use async_trait::async_trait;
use std::sync::Arc;
use storage::{SettingsUpdate, Store, MAX_TEMPERATURE, MIN_TEMPERATURE};
use talker_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{info, instrument};

use super::storage_error;

pub const HELP_TEXT: &str =
    "If you want me to respond, please enter the /token command, followed by your OpenAI API token.";
pub const TOKEN_SAVED_TEXT: &str = "Alright, let's chat!";
pub const RESET_TEXT: &str = "Fresh start!";
pub const MODEL_USAGE_TEXT: &str = "Please, enter the /model command, followed by a model name.";
pub const TEMPERATURE_USAGE_TEXT: &str =
    "Please, enter the /temperature command, followed by a number between 0 and 2.";

pub fn start_text(first_name: &str) -> String {
    format!(
        "Hi {}! I'm Talker, your pig friend. Please, enter the /token command, followed by your authentication token.",
        first_name
    )
}

/// Prompt stored with a new token; makes the model use the user's name.
pub fn persona_prompt(first_name: &str) -> String {
    format!(
        "You are \"Talker\", a funny pig, who always has an intelligent response. My name is \"{}\".",
        first_name
    )
}

/// A parsed bot command. Arguments are the rest of the line, trimmed (possibly empty).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    Token(String),
    Reset(String),
    Model(String),
    Temperature(String),
    Unknown(String),
}

/// Parses `/name[@bot] args`. Returns the command and the `@bot` suffix if any; `None` for
/// text that is not a command. The slash must be the first character, as Telegram only marks a
/// command entity at offset 0.
pub fn parse_command(text: &str) -> Option<(Command, Option<&str>)> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], rest[i..].trim()),
        None => (rest, ""),
    };
    let (name, mention) = match head.split_once('@') {
        Some((name, bot)) => (name, Some(bot)),
        None => (head, None),
    };
    if name.is_empty() {
        return None;
    }

    let args = args.to_string();
    let command = match name.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "token" => Command::Token(args),
        "reset" => Command::Reset(args),
        "model" => Command::Model(args),
        "temperature" => Command::Temperature(args),
        other => Command::Unknown(other.to_string()),
    };
    Some((command, mention))
}

/// Answers bot commands and updates per-user settings.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    store: Arc<dyn Store>,
    /// From getMe; when known, `/cmd@other_bot` is ignored.
    bot_username: Option<String>,
}

impl CommandHandler {
    pub fn new(bot: Arc<dyn Bot>, store: Arc<dyn Store>, bot_username: Option<String>) -> Self {
        Self {
            bot,
            store,
            bot_username,
        }
    }

    fn addressed_to_us(&self, mention: Option<&str>) -> bool {
        match (mention, self.bot_username.as_deref()) {
            (Some(m), Some(ours)) => m.eq_ignore_ascii_case(ours),
            _ => true,
        }
    }

    async fn reply(&self, message: &Message, text: String) -> Result<HandlerResponse> {
        self.bot.reply_to(message, &text).await?;
        Ok(HandlerResponse::Reply(text))
    }

    /// Runs one command for `message` and returns the reply text, or `None` for unknown commands.
    async fn execute(&self, command: Command, message: &Message) -> Result<Option<String>> {
        let user_id = message.user.id.to_string();
        let first_name = message.user.display_name();

        let text = match command {
            Command::Start => start_text(first_name),
            Command::Help => HELP_TEXT.to_string(),
            Command::Token(token) if token.is_empty() => HELP_TEXT.to_string(),
            Command::Token(token) => {
                self.store
                    .reset_settings(&user_id)
                    .await
                    .map_err(storage_error)?;
                let update = SettingsUpdate {
                    token: Some(token),
                    prompt: Some(persona_prompt(first_name)),
                    ..Default::default()
                };
                self.store
                    .update_settings(&user_id, &update)
                    .await
                    .map_err(storage_error)?;
                info!(user_id = %user_id, "Stored user token");
                TOKEN_SAVED_TEXT.to_string()
            }
            Command::Reset(instructions) => {
                if !instructions.is_empty() {
                    self.store
                        .update_settings(&user_id, &SettingsUpdate::prompt(instructions))
                        .await
                        .map_err(storage_error)?;
                }
                self.store
                    .reset_context(message.chat.id)
                    .await
                    .map_err(storage_error)?;
                info!(chat_id = message.chat.id, "Conversation context reset");
                RESET_TEXT.to_string()
            }
            Command::Model(model) if model.is_empty() => MODEL_USAGE_TEXT.to_string(),
            Command::Model(model) => {
                self.store
                    .update_settings(&user_id, &SettingsUpdate::gpt_model(model.clone()))
                    .await
                    .map_err(storage_error)?;
                format!("Model set to {}.", model)
            }
            Command::Temperature(raw) => match raw.parse::<f64>() {
                Ok(t) if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t) => {
                    self.store
                        .update_settings(&user_id, &SettingsUpdate::temperature(t))
                        .await
                        .map_err(storage_error)?;
                    format!("Temperature set to {}.", t)
                }
                _ => TEMPERATURE_USAGE_TEXT.to_string(),
            },
            Command::Unknown(name) => {
                info!(command = %name, "Ignoring unknown command");
                return Ok(None);
            }
        };
        Ok(Some(text))
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some((command, mention)) = parse_command(&message.content) else {
            return Ok(HandlerResponse::Continue);
        };
        if !self.addressed_to_us(mention) {
            info!(mention = ?mention, "Command addressed to another bot");
            return Ok(HandlerResponse::Stop);
        }

        match self.execute(command, message).await? {
            Some(text) => self.reply(message, text).await,
            None => Ok(HandlerResponse::Stop),
        }
    }
}
