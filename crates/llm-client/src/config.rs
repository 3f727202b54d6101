//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn max_tokens(&self) -> u32;
    fn temperature(&self) -> f32;
    fn timeout(&self) -> Duration;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_temperature: f32,
    pub llm_timeout_secs: u64,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn max_tokens(&self) -> u32 {
        self.llm_max_tokens
    }
    fn temperature(&self) -> f32 {
        self.llm_temperature
    }
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. Fails when `OPENAI_API_KEY` is missing or blank.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .context("OPENAI_API_KEY not set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let llm_model = env::var("LLM_MODEL")
            .or_else(|_| env::var("MODEL"))
            .unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string());
        let llm_max_tokens = env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let llm_temperature = env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|t| (0.0..=2.0).contains(t))
            .unwrap_or(DEFAULT_TEMPERATURE);
        let llm_timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_max_tokens,
            llm_temperature,
            llm_timeout_secs,
        })
    }

    /// Per-call options derived from this config.
    pub fn completion_options(&self) -> crate::CompletionOptions {
        crate::CompletionOptions {
            max_tokens: self.llm_max_tokens,
            temperature: self.llm_temperature,
        }
    }
}
