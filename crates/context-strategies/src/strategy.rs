//! Context building strategy trait.
//!
//! Defines the interface that all context strategies implement and the tagged result the
//! pipeline merges into the context bundle.

use assist_core::{Language, UserCategory};
use async_trait::async_trait;
use knowledge::KnowledgePassage;

use crate::types::{SessionHistory, SimilarityMatch};

/// Inputs shared by all strategies for one turn.
#[derive(Debug, Clone, Copy)]
pub struct ContextRequest<'a> {
    pub user_id: &'a str,
    /// Session of the current turn; excluded from similarity candidates.
    pub session_id: Option<&'a str>,
    pub text: &'a str,
    pub language: Language,
    pub category: Option<UserCategory>,
}

/// Result type for context strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyResult {
    Sessions(SessionHistory),
    Similar(Vec<SimilarityMatch>),
    Knowledge(Vec<KnowledgePassage>),
    /// No content from this strategy.
    Empty,
}

/// Trait for context building strategies.
#[async_trait]
pub trait ContextStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Builds context for one turn.
    async fn build_context(
        &self,
        request: &ContextRequest<'_>,
    ) -> Result<StrategyResult, anyhow::Error>;
}
