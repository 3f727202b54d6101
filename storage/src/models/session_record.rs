//! Session row model. Maps to the `chat_sessions` table.

use assist_core::{Session, StoreError};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    pub user_category: String,
    pub isolation_token: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SessionRecord> for Session {
    type Error = StoreError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        Ok(Session {
            id: record.id,
            user_id: record.user_id,
            category: record.user_category.parse()?,
            isolation_token: record.isolation_token,
            title: record.title,
            created_at: record.created_at,
        })
    }
}
