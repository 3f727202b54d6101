//! LlmClient backed by openai-client.

use async_trait::async_trait;
use prompt::ChatMessage;
use openai_client::OpenAIClient;
use tracing::{instrument, warn};

use crate::config::{LlmConfig, DEFAULT_LLM_MODEL};
use crate::{chat_message_to_openai, CompletionError, CompletionOptions, LlmClient};

#[derive(Clone)]
pub struct OpenAILlmClient {
    client: OpenAIClient,
    model: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: OpenAIClient::new(api_key, None),
            model: DEFAULT_LLM_MODEL.to_string(),
        }
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            client: OpenAIClient::new(api_key, Some(base_url)),
            model: DEFAULT_LLM_MODEL.to_string(),
        }
    }

    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url())
            .with_model(config.model().to_string())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages, options), fields(model = %self.model))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let reply = self
            .client
            .chat_completion(
                &self.model,
                openai_messages,
                options.max_tokens,
                options.temperature,
            )
            .await?;
        if reply.is_truncated() {
            warn!(max_tokens = options.max_tokens, "Reply was cut at the token limit");
        }
        if reply.content.trim().is_empty() {
            return Err(CompletionError::Empty);
        }
        Ok(reply.content)
    }
}
