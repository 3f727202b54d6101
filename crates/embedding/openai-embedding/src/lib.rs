//! # OpenAI Embedding Service
//!
//! Implementation of [`EmbeddingService`] over the OpenAI embeddings API (or any
//! OpenAI-compatible endpoint via a base URL). Used to embed knowledge passages at load time
//! and the current message at retrieval time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use openai_embedding::OpenAIEmbedding;
//! use embedding::EmbeddingService;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     let service = OpenAIEmbedding::with_api_key("sk-...".to_string());
//!     let embedding = service.embed("When does the library open?").await?;
//!     println!("Embedding dimension: {}", embedding.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequestArgs, CreateEmbeddingResponse, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingService, DEFAULT_EMBEDDING_MODEL};
use tracing::{debug, info, instrument, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI embedding service. Holds the async-openai client, model name and request timeout.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAIEmbedding {
    /// Creates a new OpenAI embedding service.
    ///
    /// An empty `api_key` falls back to the OPENAI_API_KEY environment variable.
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_base_url(api_key, model, None)
    }

    /// Creates a service that sends requests to `base_url` when set (OpenAI-compatible endpoints).
    pub fn new_with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let api_key = if api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            api_key
        };

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            openai_config = openai_config.with_api_base(url);
        }
        let client = Client::with_config(openai_config);

        Self {
            client,
            model,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a service with the default model.
    pub fn with_api_key(api_key: String) -> Self {
        Self::new(api_key, DEFAULT_EMBEDDING_MODEL.to_string())
    }

    /// Creates a service from an embedding config (key, base URL, model and timeout).
    pub fn from_config(config: &dyn EmbeddingConfig) -> Self {
        Self::new_with_base_url(
            config.api_key().to_string(),
            config.model().to_string(),
            config.base_url(),
        )
        .with_timeout(config.timeout())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Sets the per-request timeout; batch requests get twice this value.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the embedding model name (for tests and diagnostics).
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn request(
        &self,
        input: EmbeddingInput,
        timeout: Duration,
        op: &'static str,
    ) -> Result<CreateEmbeddingResponse, anyhow::Error> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(input)
            .build()?;

        let embeddings = self.client.embeddings();
        match tokio::time::timeout(timeout, embeddings.create(request)).await {
            Ok(Ok(response)) => {
                debug!(op, "OpenAI embedding response received");
                Ok(response)
            }
            Ok(Err(e)) => {
                warn!(op, error = %e, "OpenAI embedding request failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(op, timeout_secs = timeout.as_secs(), "OpenAI embedding request timed out");
                Err(anyhow::anyhow!(
                    "OpenAI {} request timed out after {} seconds",
                    op,
                    timeout.as_secs()
                ))
            }
        }
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    /// Embeds one text. Fails on API errors, timeouts or an empty response.
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        info!(model = %self.model, text_len = text.len(), "step: embedding OpenAI embed request");

        let response = self
            .request(EmbeddingInput::String(text.to_string()), self.timeout, "embed")
            .await?;

        let embedding = match response.data.into_iter().next() {
            Some(item) => item.embedding,
            None => {
                warn!("OpenAI embed response has no embedding data");
                return Err(anyhow::anyhow!("No embedding in response"));
            }
        };

        info!(dimension = embedding.len(), "step: embedding OpenAI embed done");
        Ok(embedding)
    }

    /// Embeds many texts in one request; the result has one vector per input, in order.
    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("OpenAI embed_batch empty input, skipping");
            return Ok(vec![]);
        }

        info!(model = %self.model, batch_size = texts.len(), "step: embedding OpenAI embed_batch request");

        let response = self
            .request(
                EmbeddingInput::StringArray(texts.to_vec()),
                self.timeout * 2,
                "embed_batch",
            )
            .await?;

        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|item| item.embedding).collect();

        if embeddings.len() != texts.len() {
            warn!(
                expected = texts.len(),
                got = embeddings.len(),
                "OpenAI embed_batch response count mismatch"
            );
            return Err(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            ));
        }

        let dimension = embeddings.first().map(|v| v.len()).unwrap_or(0);
        info!(count = embeddings.len(), dimension, "step: embedding OpenAI embed_batch done");
        Ok(embeddings)
    }
}
