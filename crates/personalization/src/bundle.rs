//! The context bundle of one pipeline run.

use std::collections::HashSet;

use assist_core::{Classification, UserStats};
use context_strategies::{SessionHistory, SimilarityMatch};
use knowledge::KnowledgePassage;

/// Fused retrieval results for one turn. Owned by a single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextBundle {
    pub history: SessionHistory,
    /// Best first.
    pub matches: Vec<SimilarityMatch>,
    /// Best first.
    pub passages: Vec<KnowledgePassage>,
    pub classification: Classification,
    /// Cached recent classifications; a hint for the profile only.
    pub user_stats: Option<UserStats>,
}

impl ContextBundle {
    pub fn with_user_stats(mut self, user_stats: Option<UserStats>) -> Self {
        self.user_stats = user_stats;
        self
    }

    /// True when no retrieval contributed anything.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.matches.is_empty() && self.passages.is_empty()
    }
}

/// Merges retrieval outputs. Rankings are kept; a message or passage reported twice keeps
/// its first (best-ranked) occurrence.
pub fn fuse(
    history: SessionHistory,
    matches: Vec<SimilarityMatch>,
    passages: Vec<KnowledgePassage>,
    classification: Classification,
) -> ContextBundle {
    let mut seen_messages = HashSet::new();
    let matches = matches
        .into_iter()
        .filter(|m| seen_messages.insert(m.message.id))
        .collect();

    let mut seen_passages = HashSet::new();
    let passages = passages
        .into_iter()
        .filter(|p| seen_passages.insert(p.passage_id.clone()))
        .collect();

    ContextBundle {
        history,
        matches,
        passages,
        classification,
        user_stats: None,
    }
}
