//! Knowledge retriever: thin adapter over the embedding service and the knowledge index.
//!
//! Owns no data. Any failure (empty text, embedding error, index error) degrades to an
//! empty result with a warning.

use std::sync::Arc;

use async_trait::async_trait;
use embedding::EmbeddingService;
use knowledge::{KnowledgeFilter, KnowledgeIndex, KnowledgePassage};
use tracing::{info, instrument, warn};

use crate::strategy::{ContextRequest, ContextStrategy, StrategyResult};

pub const DEFAULT_TOP_K: usize = 5;

pub struct KnowledgeRetriever {
    embedding_service: Arc<dyn EmbeddingService>,
    index: Arc<dyn KnowledgeIndex>,
    top_k: usize,
}

impl KnowledgeRetriever {
    pub fn new(embedding_service: Arc<dyn EmbeddingService>, index: Arc<dyn KnowledgeIndex>) -> Self {
        Self {
            embedding_service,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Up to `top_k` passages ordered by score descending, then passage id.
    #[instrument(skip(self, current_text), fields(text_len = current_text.len()))]
    pub async fn search_knowledge(
        &self,
        current_text: &str,
        top_k: usize,
        filter: KnowledgeFilter,
    ) -> Vec<KnowledgePassage> {
        let query = current_text.trim();
        if query.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let query_embedding = match self.embedding_service.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "KnowledgeRetriever: embedding failed, skipping knowledge search");
                return Vec::new();
            }
        };

        let mut passages = match self.index.search(&query_embedding, top_k, filter).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(error = %e, "KnowledgeRetriever: index search failed");
                return Vec::new();
            }
        };

        for passage in &mut passages {
            passage.score = if passage.score.is_nan() {
                0.0
            } else {
                passage.score.clamp(0.0, 1.0)
            };
        }
        passages.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.passage_id.cmp(&b.passage_id))
        });
        passages.truncate(top_k);

        info!(returned = passages.len(), top_k, "step: knowledge search done");
        passages
    }
}

#[async_trait]
impl ContextStrategy for KnowledgeRetriever {
    fn name(&self) -> &str {
        "KnowledgeRetriever"
    }

    async fn build_context(
        &self,
        request: &ContextRequest<'_>,
    ) -> Result<StrategyResult, anyhow::Error> {
        let mut filter = KnowledgeFilter::language(request.language);
        if let Some(category) = request.category {
            filter = filter.with_category(category);
        }
        let passages = self.search_knowledge(request.text, self.top_k, filter).await;
        if passages.is_empty() {
            return Ok(StrategyResult::Empty);
        }
        Ok(StrategyResult::Knowledge(passages))
    }
}
