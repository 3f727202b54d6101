//! Message row model. Maps to the `chat_messages` table.

use assist_core::{Message, Sentiment, StoreError};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: i64,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub intent: Option<String>,
    pub sentiment: Option<String>,
    pub lead_score: Option<i64>,
    pub is_suggestion: bool,
}

impl TryFrom<MessageRecord> for Message {
    type Error = StoreError;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let sentiment = record
            .sentiment
            .as_deref()
            .map(str::parse::<Sentiment>)
            .transpose()?;
        Ok(Message {
            id: record.id,
            session_id: record.session_id,
            role: record.role.parse()?,
            content: record.content,
            timestamp: record.timestamp,
            intent: record.intent,
            sentiment,
            lead_score: record.lead_score.map(|s| s.clamp(0, 100) as u8),
            is_suggestion: record.is_suggestion,
        })
    }
}
