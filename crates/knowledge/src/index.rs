//! Knowledge index trait and the in-memory cosine implementation.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{KnowledgeDocument, KnowledgeFilter, KnowledgePassage};

/// Nearest-neighbour search over passage embeddings.
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    /// Returns up to `top_k` passages ordered by score descending, then passage id.
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: KnowledgeFilter,
    ) -> Result<Vec<KnowledgePassage>, anyhow::Error>;

    /// Number of indexed passages.
    async fn len(&self) -> Result<usize, anyhow::Error>;
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[derive(Debug, Clone)]
struct IndexedDocument {
    document: KnowledgeDocument,
    embedding: Vec<f32>,
}

/// Knowledge index held in memory; search is a linear cosine scan.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeIndex {
    documents: Arc<RwLock<Vec<IndexedDocument>>>,
}

impl InMemoryKnowledgeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a passage with its embedding. A document with an existing id replaces it.
    pub async fn insert(&self, document: KnowledgeDocument, embedding: Vec<f32>) {
        let mut documents = self.documents.write().await;
        let entry = IndexedDocument {
            document,
            embedding,
        };
        match documents
            .iter_mut()
            .find(|d| d.document.id == entry.document.id)
        {
            Some(existing) => *existing = entry,
            None => documents.push(entry),
        }
    }
}

#[async_trait]
impl KnowledgeIndex for InMemoryKnowledgeIndex {
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: KnowledgeFilter,
    ) -> Result<Vec<KnowledgePassage>, anyhow::Error> {
        if top_k == 0 || embedding.is_empty() {
            return Ok(Vec::new());
        }
        let documents = self.documents.read().await;

        let mut passages: Vec<KnowledgePassage> = documents
            .iter()
            .filter(|d| filter.accepts(&d.document))
            .filter(|d| {
                let same_dim = d.embedding.len() == embedding.len();
                if !same_dim {
                    debug!(
                        passage_id = %d.document.id,
                        expected = embedding.len(),
                        got = d.embedding.len(),
                        "InMemoryKnowledgeIndex: dimension mismatch, skipping passage"
                    );
                }
                same_dim
            })
            .map(|d| KnowledgePassage {
                passage_id: d.document.id.clone(),
                text: d.document.text.clone(),
                score: cosine_similarity(embedding, &d.embedding).clamp(0.0, 1.0),
                source: d.document.source.clone(),
                language: d.document.language,
            })
            .collect();

        passages.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.passage_id.cmp(&b.passage_id))
        });
        passages.truncate(top_k);

        debug!(
            candidates = documents.len(),
            returned = passages.len(),
            "InMemoryKnowledgeIndex: search done"
        );
        Ok(passages)
    }

    async fn len(&self) -> Result<usize, anyhow::Error> {
        Ok(self.documents.read().await.len())
    }
}
