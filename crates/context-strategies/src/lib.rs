//! # Context Strategies
//!
//! Strategies that gather personalization context for the current message:
//!
//! - [`SessionAggregator`]: per-session analytics over the user's most recent sessions.
//! - [`SimilarityRetriever`]: past user messages textually similar to the current one, with
//!   their neighbouring messages.
//! - [`KnowledgeRetriever`]: knowledge passages nearest to the current message's embedding.
//!
//! Each strategy also implements [`ContextStrategy`] so the pipeline can run them side by
//! side and treat their results uniformly.
//!
//! ## Logging
//!
//! Strategies emit `tracing` logs for the retrieval path taken and the number of results;
//! degraded retrievals are logged with `warn!`.

mod aggregator;
mod knowledge_retriever;
mod similarity;
mod strategy;
mod types;

pub use aggregator::{summarize_session, SessionAggregator, DEFAULT_SESSION_LIMIT, PREVIEW_CHARS};
pub use knowledge_retriever::{KnowledgeRetriever, DEFAULT_TOP_K};
pub use similarity::{
    SimilarityRetriever, DEFAULT_MATCH_LIMIT, DEFAULT_MIN_SIMILARITY, MAX_CANDIDATES,
};
pub use strategy::{ContextRequest, ContextStrategy, StrategyResult};
pub use types::{SessionHistory, SessionSummary, SimilarityMatch};
