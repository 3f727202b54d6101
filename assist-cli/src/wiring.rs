//! Builds the stores and the assistant from the environment and CLI flags.

use std::sync::Arc;

use analyzer::{IntentCorpus, MessageAnalyzer};
use anyhow::{Context, Result};
use assist_core::{MessageStore, UserStatsStore};
use context_strategies::KnowledgeRetriever;
use embedding::{EmbeddingConfig, EnvEmbeddingConfig};
use knowledge::{load_jsonl, DEFAULT_LOAD_BATCH_SIZE};
use llm_client::{EnvLlmConfig, LlmConfig, OpenAILlmClient};
use openai_embedding::OpenAIEmbedding;
use pipeline::{Assistant, EnvPipelineConfig, JsonlAnalyticsSink, Pipeline};
use storage::SqliteStore;
use store_inmemory::InMemoryStore;
use tracing::{info, warn};

use crate::cli::SessionArgs;

pub struct Stores {
    pub messages: Arc<dyn MessageStore>,
    pub stats: Arc<dyn UserStatsStore>,
}

pub async fn open_stores(database_url: &str, memory: bool) -> Result<Stores> {
    if memory {
        info!("Using in-memory store");
        let store = Arc::new(InMemoryStore::new());
        return Ok(Stores {
            messages: store.clone(),
            stats: store,
        });
    }
    let store = Arc::new(
        SqliteStore::new(database_url)
            .await
            .with_context(|| format!("Open database {}", database_url))?,
    );
    info!(database_url = %database_url, "Using SQLite store");
    Ok(Stores {
        messages: store.clone(),
        stats: store,
    })
}

/// INTENT_CORPUS_PATH, else the built-in reference corpus.
fn load_analyzer() -> Result<MessageAnalyzer> {
    match std::env::var("INTENT_CORPUS_PATH").ok().filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            let corpus = IntentCorpus::from_path(&path)
                .with_context(|| format!("Load intent corpus {}", path))?;
            info!(path = %path, samples = corpus.len(), "Loaded intent corpus");
            Ok(MessageAnalyzer::new(corpus))
        }
        None => MessageAnalyzer::builtin().context("Load built-in intent corpus"),
    }
}

async fn knowledge_retriever(path: &str, top_k: usize) -> Result<Option<KnowledgeRetriever>> {
    let config = EnvEmbeddingConfig::from_env()?;
    config
        .validate()
        .context("Embedding config (EMBEDDING_PROVIDER, EMBEDDING_API_KEY / OPENAI_API_KEY)")?;
    if !config.is_enabled() {
        warn!("EMBEDDING_PROVIDER=none, knowledge retrieval disabled");
        return Ok(None);
    }
    let embedder = Arc::new(OpenAIEmbedding::from_config(&config));
    let index = load_jsonl(path, embedder.as_ref(), DEFAULT_LOAD_BATCH_SIZE).await?;
    Ok(Some(
        KnowledgeRetriever::new(embedder, Arc::new(index)).with_top_k(top_k),
    ))
}

/// Wires analyzer, retrievers, completion client and analytics sink.
///
/// A missing `OPENAI_API_KEY` is not an error: replies then come from templates. The
/// completion deadline is the shorter of `COMPLETION_TIMEOUT_SECS` and `LLM_TIMEOUT_SECS`.
pub async fn build_assistant(stores: &Stores, args: &SessionArgs) -> Result<Assistant> {
    let mut config = EnvPipelineConfig::from_env();

    let llm = if args.no_llm {
        None
    } else {
        match EnvLlmConfig::from_env() {
            Ok(llm_config) => {
                config.completion_timeout = config.completion_timeout.min(llm_config.timeout());
                let client = OpenAILlmClient::from_config(&llm_config);
                info!(model = %client.model(), "Completion client ready");
                Some((client, llm_config.completion_options()))
            }
            Err(e) => {
                warn!(error = %e, "No completion client, replying from templates");
                None
            }
        }
    };

    let mut pipeline =
        Pipeline::new(load_analyzer()?, config.clone()).with_store(stores.messages.clone());
    if let Some((client, options)) = llm {
        pipeline = pipeline.with_llm(Arc::new(client), options);
    }

    let knowledge_path = args
        .knowledge
        .clone()
        .or_else(|| std::env::var("KNOWLEDGE_PATH").ok())
        .filter(|p| !p.trim().is_empty());
    if let Some(path) = knowledge_path {
        if let Some(retriever) = knowledge_retriever(&path, config.knowledge_top_k).await? {
            pipeline = pipeline.with_knowledge(Arc::new(retriever));
        }
    }

    let mut assistant = Assistant::new(stores.messages.clone(), stores.stats.clone(), pipeline);
    if let Some(path) = &config.analytics_path {
        info!(path = %path.display(), "Writing analytics to JSONL");
        assistant = assistant.with_analytics(Arc::new(JsonlAnalyticsSink::new(path)));
    }
    Ok(assistant)
}
