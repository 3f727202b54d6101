//! JSON-lines loader: one [`KnowledgeDocument`] per line, embedded in batches.

use std::path::Path;

use anyhow::{Context, Result};
use embedding::EmbeddingService;
use tracing::info;

use crate::index::InMemoryKnowledgeIndex;
use crate::types::KnowledgeDocument;

pub const DEFAULT_LOAD_BATCH_SIZE: usize = 64;

/// Parses JSON-lines content. Blank lines and lines starting with `#` are skipped.
pub fn parse_jsonl(content: &str) -> Result<Vec<KnowledgeDocument>> {
    let mut documents = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let doc: KnowledgeDocument = serde_json::from_str(line)
            .with_context(|| format!("invalid knowledge document on line {}", idx + 1))?;
        if doc.text.trim().is_empty() {
            anyhow::bail!("knowledge document '{}' on line {} has empty text", doc.id, idx + 1);
        }
        documents.push(doc);
    }
    Ok(documents)
}

/// Reads `path`, embeds every passage with `embedder` (`batch_size` texts per request) and
/// returns the populated index.
pub async fn load_jsonl(
    path: impl AsRef<Path>,
    embedder: &dyn EmbeddingService,
    batch_size: usize,
) -> Result<InMemoryKnowledgeIndex> {
    let path = path.as_ref();
    info!(path = %path.display(), "step: knowledge load start");
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read knowledge file {}", path.display()))?;
    let documents = parse_jsonl(&content)?;

    let index = InMemoryKnowledgeIndex::new();
    let total = documents.len();
    let mut loaded = 0;
    for batch in documents.chunks(batch_size.max(1)) {
        let texts: Vec<String> = batch.iter().map(|d| d.text.clone()).collect();
        let embeddings = embedder
            .embed_batch(&texts)
            .await
            .context("failed to embed knowledge passages")?;
        if embeddings.len() != batch.len() {
            anyhow::bail!(
                "embedding service returned {} vectors for {} passages",
                embeddings.len(),
                batch.len()
            );
        }
        for (doc, embedding) in batch.iter().zip(embeddings) {
            index.insert(doc.clone(), embedding).await;
            loaded += 1;
        }
        info!(loaded, total, "step: knowledge load progress");
    }

    info!(path = %path.display(), loaded, "step: knowledge load done");
    Ok(index)
}
