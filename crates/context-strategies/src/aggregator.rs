//! Session aggregator: per-session analytics over a user's most recent sessions.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use assist_core::{
    round_to, truncate_chars, Message, MessageStore, Role, Sentiment, Session, StoreResult,
    GUEST_USER_ID, UNKNOWN_INTENT,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::strategy::{ContextRequest, ContextStrategy, StrategyResult};
use crate::types::{SessionHistory, SessionSummary};

pub const DEFAULT_SESSION_LIMIT: usize = 10;

/// Maximum characters of the first-message preview.
pub const PREVIEW_CHARS: usize = 80;

const DEFAULT_LEAD_SCORE: f64 = 50.0;

/// Summarizes a user's recent sessions. Read-only against the store.
pub struct SessionAggregator {
    store: Arc<dyn MessageStore>,
    limit: usize,
}

impl SessionAggregator {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            limit: DEFAULT_SESSION_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Summaries of the user's `limit_sessions` most recent sessions (newest first) and the
    /// user's total session count. Guests have no history.
    #[instrument(skip(self))]
    pub async fn aggregate(
        &self,
        user_id: &str,
        limit_sessions: usize,
    ) -> StoreResult<SessionHistory> {
        if user_id == GUEST_USER_ID || limit_sessions == 0 {
            return Ok(SessionHistory::default());
        }

        let sessions = self.store.recent_sessions(user_id, limit_sessions).await?;
        let total_sessions = self.store.count_sessions(user_id).await?;

        let mut summaries = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let messages = self.store.session_messages(&session.id).await?;
            summaries.push(summarize_session(session, &messages));
        }

        debug!(
            user_id,
            returned = summaries.len(),
            total_sessions,
            "SessionAggregator: aggregated sessions"
        );
        Ok(SessionHistory {
            summaries,
            total_sessions,
        })
    }
}

/// Builds the summary of one session from its messages in insertion order.
pub fn summarize_session(session: &Session, messages: &[Message]) -> SessionSummary {
    let analyzed: Vec<&Message> = messages.iter().filter(|m| m.is_analyzed()).collect();

    let intents: BTreeSet<String> = analyzed.iter().filter_map(|m| m.intent.clone()).collect();
    let dominant_intent = dominant(analyzed.iter().filter_map(|m| m.intent.clone()))
        .unwrap_or_else(|| UNKNOWN_INTENT.to_string());
    let dominant_sentiment =
        dominant(analyzed.iter().filter_map(|m| m.sentiment)).unwrap_or(Sentiment::Neutral);

    let scores: Vec<f64> = messages
        .iter()
        .filter(|m| m.role == Role::User)
        .filter_map(|m| m.lead_score.map(f64::from))
        .collect();
    let avg_lead_score = if scores.is_empty() {
        DEFAULT_LEAD_SCORE
    } else {
        round_to(scores.iter().sum::<f64>() / scores.len() as f64, 1)
    };

    let first_message = messages
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| truncate_chars(m.content.trim(), PREVIEW_CHARS));

    SessionSummary {
        session_id: session.id.clone(),
        created_at: session.created_at,
        category: session.category,
        title: session.title.clone(),
        message_count: messages.len(),
        analyzed_count: analyzed.len(),
        intents,
        dominant_intent,
        dominant_sentiment,
        avg_lead_score,
        first_message,
    }
}

/// Most frequent label; ties go to the label observed most recently.
fn dominant<T, I>(labels: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut tally: HashMap<T, (usize, usize)> = HashMap::new();
    for (position, label) in labels.into_iter().enumerate() {
        let entry = tally.entry(label).or_insert((0, position));
        entry.0 += 1;
        entry.1 = position;
    }
    tally
        .into_iter()
        .max_by_key(|(_, (count, last_seen))| (*count, *last_seen))
        .map(|(label, _)| label)
}

#[async_trait]
impl ContextStrategy for SessionAggregator {
    fn name(&self) -> &str {
        "SessionAggregator"
    }

    async fn build_context(
        &self,
        request: &ContextRequest<'_>,
    ) -> Result<StrategyResult, anyhow::Error> {
        let history = self.aggregate(request.user_id, self.limit).await?;
        if history.is_empty() {
            return Ok(StrategyResult::Empty);
        }
        Ok(StrategyResult::Sessions(history))
    }
}
