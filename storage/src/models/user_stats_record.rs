//! User stats row model. Sequences are stored as JSON arrays.

use assist_core::{Sentiment, StoreError, UserStats};
use chrono::{DateTime, Utc};

use crate::error::json_err;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStatsRecord {
    pub user_id: String,
    pub user_category: String,
    pub recent_intents: String,
    pub recent_sentiments: String,
    pub recent_lead_scores: String,
    pub total_messages: i64,
    pub updated_at: DateTime<Utc>,
}

impl UserStatsRecord {
    pub fn from_stats(stats: &UserStats) -> Result<Self, StoreError> {
        Ok(Self {
            user_id: stats.user_id.clone(),
            user_category: stats.category.to_string(),
            recent_intents: serde_json::to_string(&stats.recent_intents).map_err(json_err)?,
            recent_sentiments: serde_json::to_string(&stats.recent_sentiments)
                .map_err(json_err)?,
            recent_lead_scores: serde_json::to_string(&stats.recent_lead_scores)
                .map_err(json_err)?,
            total_messages: stats.total_messages as i64,
            updated_at: stats.updated_at,
        })
    }
}

impl TryFrom<UserStatsRecord> for UserStats {
    type Error = StoreError;

    fn try_from(record: UserStatsRecord) -> Result<Self, Self::Error> {
        let recent_sentiments: Vec<Sentiment> =
            serde_json::from_str(&record.recent_sentiments).map_err(json_err)?;
        Ok(UserStats {
            user_id: record.user_id,
            category: record.user_category.parse()?,
            recent_intents: serde_json::from_str(&record.recent_intents).map_err(json_err)?,
            recent_sentiments: recent_sentiments.into(),
            recent_lead_scores: serde_json::from_str(&record.recent_lead_scores)
                .map_err(json_err)?,
            total_messages: record.total_messages.max(0) as u64,
            updated_at: record.updated_at,
        })
    }
}
