//! Pipeline configuration loaded from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use context_strategies::{
    DEFAULT_MATCH_LIMIT, DEFAULT_MIN_SIMILARITY, DEFAULT_SESSION_LIMIT, DEFAULT_TOP_K,
};
use prompt::DEFAULT_PROMPT_BUDGET;

pub const DEFAULT_RETRIEVAL_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;
/// Confidence below which a reply asks for a follow-up.
pub const DEFAULT_FOLLOWUP_CONFIDENCE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct EnvPipelineConfig {
    pub session_limit: usize,
    pub match_limit: usize,
    pub min_similarity: f64,
    pub knowledge_top_k: usize,
    pub retrieval_timeout: Duration,
    pub completion_timeout: Duration,
    pub prompt_budget: usize,
    pub followup_confidence: f32,
    /// JSONL analytics file; analytics go to the log only when unset.
    pub analytics_path: Option<PathBuf>,
}

impl Default for EnvPipelineConfig {
    fn default() -> Self {
        Self {
            session_limit: DEFAULT_SESSION_LIMIT,
            match_limit: DEFAULT_MATCH_LIMIT,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            knowledge_top_k: DEFAULT_TOP_K,
            retrieval_timeout: Duration::from_millis(DEFAULT_RETRIEVAL_TIMEOUT_MS),
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
            prompt_budget: DEFAULT_PROMPT_BUDGET,
            followup_confidence: DEFAULT_FOLLOWUP_CONFIDENCE,
            analytics_path: None,
        }
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

impl EnvPipelineConfig {
    /// Reads the variables below; missing or unparsable values keep their defaults.
    ///
    /// `SESSION_HISTORY_LIMIT`, `SIMILAR_MATCH_LIMIT`, `MIN_SIMILARITY`, `KNOWLEDGE_TOP_K`,
    /// `RETRIEVAL_TIMEOUT_MS`, `COMPLETION_TIMEOUT_SECS`, `PROMPT_BUDGET_CHARS`,
    /// `FOLLOWUP_CONFIDENCE`, `ANALYTICS_LOG_PATH`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            session_limit: parsed("SESSION_HISTORY_LIMIT").unwrap_or(defaults.session_limit),
            match_limit: parsed("SIMILAR_MATCH_LIMIT").unwrap_or(defaults.match_limit),
            min_similarity: parsed::<f64>("MIN_SIMILARITY")
                .filter(|v| (0.0..=1.0).contains(v))
                .unwrap_or(defaults.min_similarity),
            knowledge_top_k: parsed("KNOWLEDGE_TOP_K").unwrap_or(defaults.knowledge_top_k),
            retrieval_timeout: parsed("RETRIEVAL_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retrieval_timeout),
            completion_timeout: parsed("COMPLETION_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.completion_timeout),
            prompt_budget: parsed("PROMPT_BUDGET_CHARS").unwrap_or(defaults.prompt_budget),
            followup_confidence: parsed::<f32>("FOLLOWUP_CONFIDENCE")
                .filter(|v| (0.0..=1.0).contains(v))
                .unwrap_or(defaults.followup_confidence),
            analytics_path: env::var("ANALYTICS_LOG_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
