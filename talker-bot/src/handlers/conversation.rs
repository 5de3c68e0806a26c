//! Conversation handler: history + new message → LLM → store both turns → reply.
//!
//! Returns `HandlerResponse::Reply(text)` on success. When no API key is available, or the LLM call
//! fails, the user gets a fixed message, nothing is stored and the chain stops.

use async_trait::async_trait;
use llm_client::{CompletionOptions, LlmClient};
use prompt::{build_messages, to_transcript, ChatMessage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use storage::{MessageTurn, Store, TurnRole, UserSettings};
use talker_core::{Bot, Handler, HandlerResponse, Message, Result};
use tracing::{debug, error, info, instrument};

use super::storage_error;

pub const NO_TOKEN_TEXT: &str = "Please, enter a valid token using the /token command.";
pub const LLM_FAILURE_TEXT: &str = "I cannot provide an answer right now. Please, try again later.";

/// Used for users without stored settings.
#[derive(Debug, Clone)]
pub struct ConversationDefaults {
    /// True when OPENAI_API_KEY is configured.
    pub has_default_key: bool,
    pub model: String,
    pub temperature: f32,
    pub system_prompt: String,
    /// Newest active turns sent with each prompt (0 = all).
    pub history_limit: usize,
}

pub struct ConversationHandler {
    bot: Arc<dyn Bot>,
    store: Arc<dyn Store>,
    llm: Arc<dyn LlmClient>,
    defaults: ConversationDefaults,
    /// One lock per chat held across load → LLM → append, so turns are stored in arrival order.
    chat_locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

fn log_error_chain(e: &anyhow::Error, first_msg: &str) {
    for (i, cause) in e.chain().enumerate() {
        if i == 0 {
            error!(cause = %cause, "{}", first_msg);
        } else {
            error!(cause = %cause, "Caused by");
        }
    }
}

fn turn_to_chat_message(turn: &MessageTurn) -> ChatMessage {
    match turn.role {
        TurnRole::User => ChatMessage::user(turn.text.clone()),
        TurnRole::Assistant => ChatMessage::assistant(turn.text.clone()),
    }
}

impl ConversationHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: Arc<dyn Store>,
        llm: Arc<dyn LlmClient>,
        defaults: ConversationDefaults,
    ) -> Self {
        Self {
            bot,
            store,
            llm,
            defaults,
            chat_locks: Mutex::new(HashMap::new()),
        }
    }

    fn chat_lock(&self, chat_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.chat_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(chat_id).or_default().clone()
    }

    /// Drops the chat's lock entry once no other request holds or waits on it.
    fn release_chat_lock(&self, chat_id: i64, lock: Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.chat_locks.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map plus ours.
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(&chat_id);
        }
    }

    /// Per-call LLM options and system prompt for this user.
    fn options_for(&self, settings: Option<&UserSettings>) -> (CompletionOptions, String) {
        match settings {
            Some(s) => (
                CompletionOptions {
                    api_key: s.api_key().map(str::to_string),
                    model: Some(s.gpt_model.clone()),
                    temperature: Some(s.temperature as f32),
                },
                s.prompt.clone(),
            ),
            None => (
                CompletionOptions {
                    api_key: None,
                    model: Some(self.defaults.model.clone()),
                    temperature: Some(self.defaults.temperature),
                },
                self.defaults.system_prompt.clone(),
            ),
        }
    }

    /// Load history, ask the LLM, store both turns, reply. Runs under the chat lock.
    async fn converse(&self, message: &Message) -> Result<HandlerResponse> {
        let question = message.content.trim();
        let chat_id = message.chat.id;
        let user_id = message.user.id.to_string();

        let settings = self
            .store
            .get_settings(&user_id)
            .await
            .map_err(storage_error)?;
        let (options, system_prompt) = self.options_for(settings.as_ref());
        if options.api_key.is_none() && !self.defaults.has_default_key {
            info!("No API key for user");
            return self.stop_with(message, NO_TOKEN_TEXT).await;
        }

        let conversation = self
            .store
            .get_conversation(chat_id)
            .await
            .map_err(storage_error)?;
        let history: Vec<ChatMessage> = conversation
            .as_ref()
            .map(|c| {
                c.recent_turns(self.defaults.history_limit)
                    .iter()
                    .map(turn_to_chat_message)
                    .collect()
            })
            .unwrap_or_default();
        info!(history_turns = history.len(), "step: conversation loaded");

        let user_turn = MessageTurn::user(question);
        let messages = build_messages(Some(&system_prompt), history, question);
        debug!(prompt = %to_transcript(&messages), "step: prompt built");

        let reply = match self.llm.complete(messages, &options).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                error!("LLM returned an empty reply");
                return self.stop_with(message, LLM_FAILURE_TEXT).await;
            }
            Err(e) => {
                log_error_chain(&e, "LLM request failed");
                return self.stop_with(message, LLM_FAILURE_TEXT).await;
            }
        };

        self.store
            .append_turns(chat_id, &[user_turn, MessageTurn::assistant(reply.clone())])
            .await
            .map_err(storage_error)?;
        info!("step: turns stored");

        self.bot.reply_to(message, &reply).await?;
        Ok(HandlerResponse::Reply(reply))
    }

    async fn stop_with(&self, message: &Message, text: &str) -> Result<HandlerResponse> {
        self.bot.reply_to(message, text).await?;
        Ok(HandlerResponse::Stop)
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.content.trim().is_empty() {
            return Ok(HandlerResponse::Ignore);
        }
        let chat_id = message.chat.id;
        let lock = self.chat_lock(chat_id);
        let result = {
            let _guard = lock.lock().await;
            self.converse(message).await
        };
        self.release_chat_lock(chat_id, lock);
        result
    }
}
