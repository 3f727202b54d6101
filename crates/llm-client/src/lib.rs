//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait, the per-call [`CompletionOptions`] and the
//! [`CompletionError`] every implementation reports. The completion service is a black box:
//! given the assembled messages it returns text.

use async_trait::async_trait;
use openai_client::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use prompt::{ChatMessage, MessageRole};
use std::time::Duration;
use thiserror::Error;

mod config;
mod openai_llm;

pub use config::{
    EnvLlmConfig, LlmConfig, DEFAULT_LLM_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
pub use openai_llm::OpenAILlmClient;


/// Generation parameters of one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("Completion returned no text")]
    Empty,

    #[error("Completion request failed: {0}")]
    Request(#[from] anyhow::Error),
}

/// Completion service: returns the reply text for the given messages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(msg: &ChatMessage) -> anyhow::Result<ChatCompletionRequestMessage> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}
