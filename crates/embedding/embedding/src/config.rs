//! Embedding configuration: trait and env-based implementation.

use anyhow::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    /// `openai` or `none`. With `none` the knowledge retriever is disabled.
    fn provider(&self) -> &str;
    /// API key for the OpenAI-compatible endpoint (EMBEDDING_API_KEY, else OPENAI_API_KEY).
    fn api_key(&self) -> &str;
    /// Optional base URL for OpenAI-compatible endpoints (EMBEDDING_BASE_URL, else OPENAI_BASE_URL).
    fn base_url(&self) -> Option<&str>;
    fn model(&self) -> &str;
    fn timeout(&self) -> Duration;

    fn is_enabled(&self) -> bool {
        !self.provider().eq_ignore_ascii_case("none")
    }
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub embedding_provider: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn provider(&self) -> &str {
        &self.embedding_provider
    }
    fn api_key(&self) -> &str {
        &self.api_key
    }
    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|s| !s.is_empty())
    }
    fn model(&self) -> &str {
        &self.model
    }
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let embedding_provider =
            env::var("EMBEDDING_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let api_key = env::var("EMBEDDING_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .unwrap_or_default();
        let base_url = env::var("EMBEDDING_BASE_URL")
            .or_else(|_| env::var("OPENAI_BASE_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        let model = env::var("EMBEDDING_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let timeout_secs = env::var("EMBEDDING_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        Ok(Self {
            embedding_provider,
            api_key,
            base_url,
            model,
            timeout_secs,
        })
    }

    /// Validate config: the provider must be known and `openai` needs an API key.
    pub fn validate(&self) -> Result<()> {
        let provider = self.embedding_provider.to_ascii_lowercase();
        match provider.as_str() {
            "none" => Ok(()),
            "openai" if self.api_key.is_empty() => anyhow::bail!(
                "EMBEDDING_PROVIDER=openai requires EMBEDDING_API_KEY or OPENAI_API_KEY to be set"
            ),
            "openai" => Ok(()),
            other => anyhow::bail!(
                "Unknown EMBEDDING_PROVIDER '{}', expected 'openai' or 'none'",
                other
            ),
        }
    }
}
