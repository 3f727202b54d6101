//! Derived records produced by the strategies. Never persisted.

use std::collections::BTreeSet;

use assist_core::{Message, Sentiment, UserCategory};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Analytics of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub category: UserCategory,
    pub title: Option<String>,
    /// All messages of the session, both roles.
    pub message_count: usize,
    /// User messages carrying both an intent and a sentiment.
    pub analyzed_count: usize,
    /// Distinct intents of analyzed user messages, sorted.
    pub intents: BTreeSet<String>,
    pub dominant_intent: String,
    pub dominant_sentiment: Sentiment,
    /// Mean lead score of scored user messages, one decimal; 50.0 when none are scored.
    pub avg_lead_score: f64,
    /// Preview of the first user message.
    pub first_message: Option<String>,
}

/// The most recent sessions of a user plus the total count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionHistory {
    /// Most recent first.
    pub summaries: Vec<SessionSummary>,
    pub total_sessions: usize,
}

impl SessionHistory {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// A past user message similar to the current one, with its session neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
    /// Character-sequence ratio in [0, 1], three decimals.
    pub score: f64,
    pub message: Message,
    pub previous: Option<Message>,
    pub next: Option<Message>,
    pub session_id: String,
    pub session_created_at: DateTime<Utc>,
}

impl SimilarityMatch {
    /// Sentiment recorded for the matched message, if it was analyzed.
    pub fn sentiment(&self) -> Option<Sentiment> {
        self.message.sentiment
    }
}
