//! # OpenAI API client
//!
//! Non-streaming chat completion over [async-openai] for the reply generator. Returns the
//! reply text together with the finish reason and token usage, and never logs the API key
//! in clear.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{CreateChatCompletionRequestArgs, FinishReason},
    Client,
};
use tracing::{debug, info, warn};

pub use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

/// Masks an API key for logging: first 7 chars + "***" + last 4 chars; keys of 11 chars or
/// fewer become "***".
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Token counts reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// First choice of a chat completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<TokenUsage>,
}

impl ChatReply {
    /// True when generation stopped at the token limit.
    pub fn is_truncated(&self) -> bool {
        matches!(self.finish_reason, Some(FinishReason::Length))
    }
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    masked_key: String,
}

impl OpenAIClient {
    /// `base_url` selects an OpenAI-compatible endpoint; `None` or empty uses the default.
    pub fn new(api_key: String, base_url: Option<&str>) -> Self {
        let masked_key = mask_token(&api_key);
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Arc::new(Client::with_config(config)),
            masked_key,
        }
    }

    pub fn masked_key(&self) -> &str {
        &self.masked_key
    }

    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> anyhow::Result<ChatReply> {
        info!(
            model = %model,
            message_count = messages.len(),
            max_tokens,
            temperature,
            api_key = %self.masked_key,
            "OpenAI chat_completion request"
        );

        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .max_tokens(max_tokens)
            .temperature(temperature)
            .build()?;
        if let Ok(json) = serde_json::to_string(&request) {
            debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;
        let usage = response.usage.as_ref().map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        });
        let Some(choice) = response.choices.into_iter().next() else {
            anyhow::bail!("OpenAI returned no choices");
        };

        let reply = ChatReply {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage,
        };
        if reply.is_truncated() {
            warn!(max_tokens, "OpenAI reply stopped at the token limit");
        }
        info!(
            prompt_tokens = usage.map(|u| u.prompt_tokens),
            completion_tokens = usage.map(|u| u.completion_tokens),
            reply_len = reply.content.len(),
            "OpenAI chat_completion done"
        );
        Ok(reply)
    }
}
