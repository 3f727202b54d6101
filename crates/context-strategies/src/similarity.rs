//! Similarity retriever: past user messages textually close to the current message.
//!
//! Candidates are the user's last [`MAX_CANDIDATES`] user-authored messages outside the
//! current session. Each is scored with the character-sequence ratio of the trimmed,
//! lower-cased texts. The threshold and the ordering use the raw ratio; only the reported
//! score is rounded. Equal ratios fall back to recency (timestamp, then id), so identical
//! store state always yields identical output.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use assist_core::{
    round_to, sequence_ratio, Message, MessageStore, StoreResult, GUEST_USER_ID,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::strategy::{ContextRequest, ContextStrategy, StrategyResult};
use crate::types::SimilarityMatch;

pub const MAX_CANDIDATES: usize = 200;
pub const DEFAULT_MATCH_LIMIT: usize = 5;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.40;

/// Texts shorter than this (in chars) only match candidates of at least this length.
const SHORT_TEXT_CHARS: usize = 3;

pub struct SimilarityRetriever {
    store: Arc<dyn MessageStore>,
    limit: usize,
    min_similarity: f64,
}

impl SimilarityRetriever {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            limit: DEFAULT_MATCH_LIMIT,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity.clamp(0.0, 1.0);
        self
    }

    /// Up to `limit` matches with score >= `min_similarity`, best first.
    #[instrument(skip(self, current_text), fields(text_len = current_text.len()))]
    pub async fn find_similar(
        &self,
        current_text: &str,
        user_id: &str,
        exclude_session_id: Option<&str>,
        limit: usize,
        min_similarity: f64,
    ) -> StoreResult<Vec<SimilarityMatch>> {
        if user_id == GUEST_USER_ID || limit == 0 {
            return Ok(Vec::new());
        }

        let query = current_text.trim().to_lowercase();
        let short_query = query.chars().count() < SHORT_TEXT_CHARS;

        let candidates = self
            .store
            .recent_user_messages(user_id, exclude_session_id, MAX_CANDIDATES)
            .await?;
        let candidate_count = candidates.len();

        let mut scored: Vec<(f64, Message)> = candidates
            .into_iter()
            .filter_map(|message| {
                let text = message.content.trim().to_lowercase();
                if short_query && text.chars().count() < SHORT_TEXT_CHARS {
                    return None;
                }
                let ratio = sequence_ratio(&query, &text);
                (ratio >= min_similarity).then_some((ratio, message))
            })
            .collect();

        scored.sort_by(|(ratio_a, a), (ratio_b, b)| {
            ratio_b
                .partial_cmp(ratio_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.timestamp.cmp(&a.timestamp))
                .then_with(|| b.id.cmp(&a.id))
        });
        scored.truncate(limit);

        let mut session_times: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut matches = Vec::with_capacity(scored.len());
        for (ratio, message) in scored {
            let cached = session_times.get(&message.session_id).copied();
            let session_created_at = match cached {
                Some(created_at) => created_at,
                None => match self.store.get_session(&message.session_id).await? {
                    Some(session) => {
                        session_times.insert(session.id.clone(), session.created_at);
                        session.created_at
                    }
                    None => {
                        debug!(
                            session_id = %message.session_id,
                            "SimilarityRetriever: session vanished, skipping match"
                        );
                        continue;
                    }
                },
            };
            let neighbors = self.store.message_neighbors(&message).await?;
            matches.push(SimilarityMatch {
                score: round_to(ratio, 3),
                session_id: message.session_id.clone(),
                session_created_at,
                previous: neighbors.before,
                next: neighbors.after,
                message,
            });
        }

        debug!(
            user_id,
            candidates = candidate_count,
            returned = matches.len(),
            min_similarity,
            "SimilarityRetriever: similarity search done"
        );
        Ok(matches)
    }
}

#[async_trait]
impl ContextStrategy for SimilarityRetriever {
    fn name(&self) -> &str {
        "SimilarityRetriever"
    }

    async fn build_context(
        &self,
        request: &ContextRequest<'_>,
    ) -> Result<StrategyResult, anyhow::Error> {
        let matches = self
            .find_similar(
                request.text,
                request.user_id,
                request.session_id,
                self.limit,
                self.min_similarity,
            )
            .await?;
        if matches.is_empty() {
            return Ok(StrategyResult::Empty);
        }
        Ok(StrategyResult::Similar(matches))
    }
}
