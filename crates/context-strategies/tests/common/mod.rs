//! Shared test utilities for context-strategies integration tests.
//!
//! Provides seeding helpers over `InMemoryStore`, a deterministic keyword embedder and
//! failing collaborators for the degradation paths.

#![allow(dead_code)]

use std::sync::Arc;

use assist_core::{MessageStore, NewMessage, NewSession, Sentiment, UserCategory};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use embedding::EmbeddingService;
use knowledge::{KnowledgeFilter, KnowledgeIndex, KnowledgePassage};
use store_inmemory::InMemoryStore;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

pub fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

/// Creates a signed-in session `day` days after the base time.
pub async fn session(store: &InMemoryStore, user: &str, id: &str, day: i64) {
    store
        .create_session(
            NewSession::new(user, UserCategory::Student)
                .with_id(id)
                .with_created_at(base_time() + Duration::days(day)),
        )
        .await
        .expect("create session");
}

/// Inserts an analyzed user message at `base + minute`.
pub async fn user_msg(
    store: &InMemoryStore,
    session_id: &str,
    text: &str,
    minute: i64,
    sentiment: Sentiment,
) -> assist_core::Message {
    store
        .insert_message(
            NewMessage::user(session_id, text)
                .with_timestamp(base_time() + Duration::minutes(minute))
                .with_intent("general_query")
                .with_sentiment(sentiment)
                .with_lead_score(50),
        )
        .await
        .expect("insert user message")
}

pub async fn reply(
    store: &InMemoryStore,
    session_id: &str,
    text: &str,
    minute: i64,
) -> assist_core::Message {
    store
        .insert_message(
            NewMessage::assistant(session_id, text)
                .with_timestamp(base_time() + Duration::minutes(minute)),
        )
        .await
        .expect("insert reply")
}

const TOPICS: &[&str] = &["enroll", "library", "exam", "password", "partner"];

/// Embeds a text as topic keyword counts; deterministic and dependency-free.
pub struct KeywordEmbedder;

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    TOPICS
        .iter()
        .map(|t| lower.matches(t).count() as f32)
        .collect()
}

#[async_trait]
impl EmbeddingService for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(keyword_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|t| keyword_vector(t)).collect())
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingService for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        anyhow::bail!("embedding service unavailable")
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        anyhow::bail!("embedding service unavailable")
    }
}

/// Index returning fixed passages regardless of the query (unsorted, unclamped).
pub struct FixedIndex(pub Vec<KnowledgePassage>);

#[async_trait]
impl KnowledgeIndex for FixedIndex {
    async fn search(
        &self,
        _embedding: &[f32],
        _top_k: usize,
        _filter: KnowledgeFilter,
    ) -> Result<Vec<KnowledgePassage>, anyhow::Error> {
        Ok(self.0.clone())
    }

    async fn len(&self) -> Result<usize, anyhow::Error> {
        Ok(self.0.len())
    }
}

pub struct FailingIndex;

#[async_trait]
impl KnowledgeIndex for FailingIndex {
    async fn search(
        &self,
        _embedding: &[f32],
        _top_k: usize,
        _filter: KnowledgeFilter,
    ) -> Result<Vec<KnowledgePassage>, anyhow::Error> {
        anyhow::bail!("index offline")
    }

    async fn len(&self) -> Result<usize, anyhow::Error> {
        anyhow::bail!("index offline")
    }
}

pub fn passage(id: &str, score: f32) -> KnowledgePassage {
    KnowledgePassage {
        passage_id: id.to_string(),
        text: format!("passage {}", id),
        score,
        source: None,
        language: None,
    }
}
