//! LLM configuration loaded from environment variables.

use anyhow::{bail, Result};
use std::env;

use crate::openai_llm::DEFAULT_MODEL;

/// LLM config loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvLlmConfig {
    /// Default key; users can bring their own with `/token`.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub llm_model: String,
    pub temperature: f32,
    pub llm_system_prompt: Option<String>,
}

impl EnvLlmConfig {
    /// Load from environment variables. Fails on a TEMPERATURE that is not a number.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| openai_client::DEFAULT_BASE_URL.to_string());
        let llm_model = env::var("MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let temperature = match env::var("TEMPERATURE") {
            Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<f32>() {
                Ok(t) => t,
                Err(_) => bail!("TEMPERATURE must be a number, got {:?}", raw),
            },
            _ => 0.0,
        };
        let llm_system_prompt = env::var("LLM_SYSTEM_PROMPT")
            .or_else(|_| env::var("SYSTEM_PROMPT"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            temperature,
            llm_system_prompt,
        })
    }
}
