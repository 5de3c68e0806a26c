//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::Result;
use handler_chain::HandlerChain;
use llm_client::{LlmClient, OpenAILlmClient};
use std::sync::Arc;
use storage::Store;
use talker_core::Bot;
use tracing::{error, info, instrument};

use crate::config::BotConfig;
use crate::handlers::{CommandHandler, ConversationDefaults, ConversationHandler, LoggingHandler};
use crate::telegram::{build_teloxide_bot, fetch_bot_username, TelegramBotAdapter};

/// Shared dependencies of the handler chain.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub bot: Arc<dyn Bot>,
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn LlmClient>,
    pub bot_username: Option<String>,
}

/// Opens storage, builds the Telegram and LLM clients, and fetches the bot username.
#[instrument(skip(config))]
pub async fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let store = storage::connect(config.database_url(), config.database_name())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to initialize storage");
            anyhow::anyhow!("Failed to initialize storage: {}", e)
        })?;

    let teloxide_bot = build_teloxide_bot(config)?;
    let bot_username = fetch_bot_username(&teloxide_bot).await;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::from_config(&config.llm));

    info!(
        has_default_key = config.llm.openai_api_key.is_some(),
        model = %config.llm.llm_model,
        "Components ready"
    );

    Ok(BotComponents {
        teloxide_bot,
        bot,
        store,
        llm,
        bot_username,
    })
}

pub fn conversation_defaults(config: &BotConfig) -> ConversationDefaults {
    ConversationDefaults {
        has_default_key: config.llm.openai_api_key.is_some(),
        model: config.llm.llm_model.clone(),
        temperature: config.llm.temperature,
        system_prompt: config.system_prompt().to_string(),
        history_limit: config.history_limit,
    }
}

/// Builds the handler chain (logging → commands → conversation).
pub fn build_handler_chain(
    bot: Arc<dyn Bot>,
    store: Arc<dyn Store>,
    llm: Arc<dyn LlmClient>,
    bot_username: Option<String>,
    defaults: ConversationDefaults,
) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(CommandHandler::new(
            bot.clone(),
            store.clone(),
            bot_username,
        )))
        .add_handler(Arc::new(ConversationHandler::new(bot, store, llm, defaults)))
}

impl BotComponents {
    pub fn handler_chain(&self, config: &BotConfig) -> HandlerChain {
        build_handler_chain(
            self.bot.clone(),
            self.store.clone(),
            self.llm.clone(),
            self.bot_username.clone(),
            conversation_defaults(config),
        )
    }
}
