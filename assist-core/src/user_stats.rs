//! Per-user cache of the most recent classifications.
//!
//! Updated after every completed turn and read as a hint when building the user profile.
//! Raw messages stay authoritative; nothing here is required for correctness.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Sentiment, UserCategory};

/// Maximum number of entries kept per sequence; the oldest entry is evicted first.
pub const USER_STATS_CAPACITY: usize = 10;

/// Classification fields of one completed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnStats {
    pub intent: String,
    pub sentiment: Sentiment,
    pub lead_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    pub category: UserCategory,
    pub recent_intents: VecDeque<String>,
    pub recent_sentiments: VecDeque<Sentiment>,
    pub recent_lead_scores: VecDeque<u8>,
    pub total_messages: u64,
    pub updated_at: DateTime<Utc>,
}

impl UserStats {
    pub fn new(user_id: impl Into<String>, category: UserCategory) -> Self {
        Self {
            user_id: user_id.into(),
            category,
            recent_intents: VecDeque::with_capacity(USER_STATS_CAPACITY),
            recent_sentiments: VecDeque::with_capacity(USER_STATS_CAPACITY),
            recent_lead_scores: VecDeque::with_capacity(USER_STATS_CAPACITY),
            total_messages: 0,
            updated_at: Utc::now(),
        }
    }

    /// Appends one turn, evicting the oldest entries beyond [`USER_STATS_CAPACITY`].
    pub fn record(&mut self, turn: &TurnStats, at: DateTime<Utc>) {
        push_bounded(&mut self.recent_intents, turn.intent.clone());
        push_bounded(&mut self.recent_sentiments, turn.sentiment);
        push_bounded(&mut self.recent_lead_scores, turn.lead_score);
        self.total_messages += 1;
        self.updated_at = at;
    }

    pub fn is_returning(&self) -> bool {
        self.total_messages > 1
    }

    /// Most frequent cached intent; ties go to the intent seen most recently.
    pub fn most_common_intent(&self) -> Option<&str> {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (pos, intent) in self.recent_intents.iter().enumerate() {
            let entry = counts.entry(intent.as_str()).or_insert((0, pos));
            entry.0 += 1;
            entry.1 = pos;
        }
        counts
            .into_iter()
            .max_by_key(|(_, (count, last_pos))| (*count, *last_pos))
            .map(|(intent, _)| intent)
    }

    /// The last `n` cached sentiments, oldest first.
    pub fn recent_sentiment_tail(&self, n: usize) -> Vec<Sentiment> {
        let skip = self.recent_sentiments.len().saturating_sub(n);
        self.recent_sentiments.iter().skip(skip).copied().collect()
    }

    pub fn average_lead_score(&self) -> Option<f64> {
        if self.recent_lead_scores.is_empty() {
            return None;
        }
        let sum: u32 = self.recent_lead_scores.iter().map(|s| u32::from(*s)).sum();
        Some(f64::from(sum) / self.recent_lead_scores.len() as f64)
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T) {
    while queue.len() >= USER_STATS_CAPACITY {
        queue.pop_front();
    }
    queue.push_back(value);
}
