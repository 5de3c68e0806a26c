//! OpenAI-backed [`LlmClient`]: wraps openai-client and applies per-call options.

use anyhow::{Context, Result};
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, CompletionOptions, LlmClient};
use crate::config::EnvLlmConfig;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// [`LlmClient`] over an OpenAI-compatible endpoint.
///
/// The default key may be absent; calls then need [`CompletionOptions::api_key`].
#[derive(Clone)]
pub struct OpenAILlmClient {
    base_url: String,
    default_client: Option<openai_client::OpenAIClient>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAILlmClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, openai_client::DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        let default_client = api_key
            .filter(|k| !k.trim().is_empty())
            .map(|k| openai_client::OpenAIClient::with_base_url(k, base_url.clone()));
        Self {
            base_url,
            default_client,
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
        }
    }

    /// Client from env config: key, base URL, model and temperature.
    pub fn from_config(config: &EnvLlmConfig) -> Self {
        Self::with_base_url(config.openai_api_key.clone(), config.openai_base_url.clone())
            .with_model(config.llm_model.clone())
            .with_temperature(config.temperature)
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn has_default_key(&self) -> bool {
        self.default_client.is_some()
    }

    fn client_for(&self, options: &CompletionOptions) -> Result<openai_client::OpenAIClient> {
        match options.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Ok(openai_client::OpenAIClient::with_base_url(
                key.to_string(),
                self.base_url.clone(),
            )),
            None => self.default_client.clone().context("no OpenAI API key configured"),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages, options), fields(message_count = messages.len()))]
    async fn complete(&self, messages: Vec<ChatMessage>, options: &CompletionOptions) -> Result<String> {
        let client = self.client_for(options)?;
        let model = options.model.as_deref().unwrap_or(&self.model);
        let temperature = options.temperature.or(self.temperature);

        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;

        client.chat_completion(model, temperature, openai_messages).await
    }
}
