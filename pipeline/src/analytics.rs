//! Per-turn analytics records and their sinks.
//!
//! One record is emitted after every persisted turn. Sinks are best effort: a failing sink
//! is logged and never fails the turn.

use std::path::{Path, PathBuf};

use analyzer::BiasLevel;
use assist_core::{Language, Sentiment, UserCategory};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

use crate::topic::Topic;
use crate::turn::{ResponseSource, TurnContext};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsRecord {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub session_id: String,
    pub category: UserCategory,
    pub language: Language,
    pub intent: String,
    pub confidence: f32,
    pub sentiment: Sentiment,
    pub lead_score: u8,
    pub bias_level: BiasLevel,
    pub bias_score: f32,
    /// Absolute or loaded words found in the message.
    pub bias_patterns: Vec<String>,
    pub topic: Topic,
    pub topic_depth: u32,
    pub tone: Option<String>,
    pub register: Option<String>,
    pub trend: Option<&'static str>,
    pub response_source: ResponseSource,
    pub sessions_used: usize,
    pub matches_used: usize,
    pub passages_used: usize,
    pub prompt_chars: Option<usize>,
    pub prompt_truncated: bool,
    pub requires_followup: bool,
}

impl AnalyticsRecord {
    pub fn from_turn(turn: &TurnContext, timestamp: DateTime<Utc>) -> Self {
        let c = &turn.classification;
        let personalization = turn.personalization.as_ref();
        Self {
            timestamp,
            user_id: turn.input.user_id.clone(),
            session_id: turn.input.session_id.clone(),
            category: turn.input.category,
            language: c.language,
            intent: c.intent.clone(),
            confidence: c.confidence,
            sentiment: c.sentiment,
            lead_score: c.lead_score,
            bias_level: turn.bias.level,
            bias_score: turn.bias.score,
            bias_patterns: turn.bias.patterns.clone(),
            topic: turn.topic,
            topic_depth: turn.topic_depth,
            tone: personalization.map(|p| p.tone.to_string()),
            register: personalization.map(|p| p.register.to_string()),
            trend: personalization.map(|p| p.trend.kind()),
            response_source: turn.response_source,
            sessions_used: turn.bundle.history.summaries.len(),
            matches_used: turn.bundle.matches.len(),
            passages_used: turn.bundle.passages.len(),
            prompt_chars: turn.prompt.as_ref().map(|p| p.system_chars()),
            prompt_truncated: turn.prompt.as_ref().is_some_and(|p| p.truncated),
            requires_followup: turn.requires_followup,
        }
    }
}

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, record: &AnalyticsRecord) -> anyhow::Result<()>;
}

/// Emits records as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalyticsSink;

#[async_trait]
impl AnalyticsSink for TracingAnalyticsSink {
    async fn record(&self, record: &AnalyticsRecord) -> anyhow::Result<()> {
        info!(
            user_id = %record.user_id,
            session_id = %record.session_id,
            intent = %record.intent,
            sentiment = %record.sentiment,
            lead_score = record.lead_score,
            bias_level = ?record.bias_level,
            bias_score = record.bias_score,
            topic = %record.topic,
            trend = record.trend.unwrap_or("none"),
            source = record.response_source.as_str(),
            requires_followup = record.requires_followup,
            "analytics: turn"
        );
        Ok(())
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonlAnalyticsSink {
    path: PathBuf,
    /// Serializes appends so lines never interleave.
    lock: Mutex<()>,
}

impl JsonlAnalyticsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AnalyticsSink for JsonlAnalyticsSink {
    async fn record(&self, record: &AnalyticsRecord) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
