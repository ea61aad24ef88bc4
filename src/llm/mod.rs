pub mod models;
pub mod openai;

use openai::OpenAiProvider;

use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use models::{ChatOptions, Message, StreamUnit};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
    #[error("Rate Limited")]
    RateLimited,
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("Missing configuration for provider: {0}")]
    MissingConfig(String),
}

/// Units of one streamed completion, in arrival order. The stream ending is the end-of-stream signal.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<StreamUnit, LlmError>> + Send>>;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Opens a streamed completion over `messages`.
    async fn chat_stream(&self, messages: &[Message], options: ChatOptions) -> Result<TokenStream, LlmError>;
}

pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_default(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
        let provider_name = config.llm.provider.as_str();

        match provider_name {
            "openai" => {
                let cfg = config
                    .llm
                    .openai
                    .as_ref()
                    .ok_or_else(|| LlmError::MissingConfig(provider_name.to_string()))?;
                Ok(Arc::new(OpenAiProvider::new(
                    cfg.api_key.clone(),
                    cfg.api_base.clone(),
                    cfg.default_model.clone(),
                )))
            }
            other => Err(LlmError::UnsupportedProvider(other.to_string())),
        }
    }

    /// Options applied to every turn, derived from the configuration.
    pub fn default_options(config: &AppConfig) -> ChatOptions {
        let openai = config.llm.openai.as_ref();
        ChatOptions {
            model: None,
            temperature: openai.and_then(|c| c.temperature),
            max_tokens: openai.and_then(|c| c.max_tokens),
            system_prompt: config.chat.system_prompt.clone(),
            tools: config.chat.tools.clone(),
        }
    }
}
