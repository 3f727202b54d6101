//! SQLite store: persistence and queries for sessions, messages and user stats.
//!
//! Uses SqlitePoolManager and the row models. Tables are created on construction.

use assist_core::{
    Message, MessageNeighbors, MessageStore, NewMessage, NewSession, Session, StoreError,
    StoreResult, TurnStats, UserCategory, UserStats, UserStatsStore,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, instrument};

use crate::error::db_err;
use crate::models::{MessageRecord, SessionRecord, UserStatsRecord};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                user_category TEXT NOT NULL,
                isolation_token TEXT,
                title TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL REFERENCES chat_sessions(id),
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                intent TEXT,
                sentiment TEXT,
                lead_score INTEGER,
                is_suggestion INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_stats (
                user_id TEXT PRIMARY KEY,
                user_category TEXT NOT NULL,
                recent_intents TEXT NOT NULL,
                recent_sentiments TEXT NOT NULL,
                recent_lead_scores TEXT NOT NULL,
                total_messages INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON chat_sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_isolation_token ON chat_sessions(isolation_token);
            CREATE INDEX IF NOT EXISTS idx_messages_session_id ON chat_messages(session_id);
            CREATE INDEX IF NOT EXISTS idx_messages_role ON chat_messages(role);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }
}

/// Inserts one message inside `tx` and touches its session. Rolled back with `tx` on error.
async fn insert_in(
    tx: &mut Transaction<'_, Sqlite>,
    message: &NewMessage,
) -> StoreResult<i64> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM chat_sessions WHERE id = ?")
        .bind(&message.session_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_err)?;
    if exists.is_none() {
        return Err(StoreError::NotFound(format!(
            "session {}",
            message.session_id
        )));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO chat_messages (session_id, role, content, timestamp, intent, sentiment, lead_score, is_suggestion)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&message.session_id)
    .bind(message.role.as_str())
    .bind(&message.content)
    .bind(message.timestamp)
    .bind(&message.intent)
    .bind(message.sentiment.map(|s| s.as_str()))
    .bind(message.lead_score.map(i64::from))
    .bind(message.is_suggestion)
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;

    sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(&message.session_id)
        .execute(&mut **tx)
        .await
        .map_err(db_err)?;

    Ok(result.last_insert_rowid())
}

fn into_messages(records: Vec<MessageRecord>) -> StoreResult<Vec<Message>> {
    records.into_iter().map(Message::try_from).collect()
}

fn into_sessions(records: Vec<SessionRecord>) -> StoreResult<Vec<Session>> {
    records.into_iter().map(Session::try_from).collect()
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn create_session(&self, session: NewSession) -> StoreResult<Session> {
        let session = session.into_session();
        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, user_id, user_category, isolation_token, title, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(session.category.as_str())
        .bind(&session.isolation_token)
        .bind(&session.title)
        .bind(session.created_at)
        .bind(session.created_at)
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_err)?;

        info!(session_id = %session.id, user_id = %session.user_id, "Created session");
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> StoreResult<Option<Session>> {
        let record = sqlx::query_as::<_, SessionRecord>("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(self.pool_manager.pool())
            .await
            .map_err(db_err)?;
        record.map(Session::try_from).transpose()
    }

    async fn update_session_title(&self, session_id: &str, title: &str) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE chat_sessions SET title = ?, updated_at = ? WHERE id = ?")
                .bind(title)
                .bind(Utc::now())
                .bind(session_id)
                .execute(self.pool_manager.pool())
                .await
                .map_err(db_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("session {}", session_id)));
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> StoreResult<bool> {
        let mut tx = self.pool_manager.pool().begin().await.map_err(db_err)?;
        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        info!(session_id = %session_id, deleted = result.rows_affected(), "Deleted session");
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, message), fields(session_id = %message.session_id, role = %message.role))]
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        let mut tx = self.pool_manager.pool().begin().await.map_err(db_err)?;
        let id = insert_in(&mut tx, &message).await?;
        tx.commit().await.map_err(db_err)?;

        debug!(message_id = id, "Saved message");
        Ok(message.into_message(id))
    }

    #[instrument(skip(self, user, assistant), fields(session_id = %user.session_id))]
    async fn insert_turn(
        &self,
        user: NewMessage,
        assistant: NewMessage,
    ) -> StoreResult<(Message, Message)> {
        let mut tx = self.pool_manager.pool().begin().await.map_err(db_err)?;
        let user_id = insert_in(&mut tx, &user).await?;
        let assistant_id = insert_in(&mut tx, &assistant).await?;
        tx.commit().await.map_err(db_err)?;

        debug!(user_message_id = user_id, assistant_message_id = assistant_id, "Saved turn");
        Ok((user.into_message(user_id), assistant.into_message(assistant_id)))
    }

    async fn get_message(&self, id: i64) -> StoreResult<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>("SELECT * FROM chat_messages WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await
            .map_err(db_err)?;
        record.map(Message::try_from).transpose()
    }

    async fn session_messages(&self, session_id: &str) -> StoreResult<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        into_messages(records)
    }

    async fn message_neighbors(&self, message: &Message) -> StoreResult<MessageNeighbors> {
        let pool = self.pool_manager.pool();
        let before = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM chat_messages WHERE session_id = ? AND id < ? ORDER BY id DESC LIMIT 1",
        )
        .bind(&message.session_id)
        .bind(message.id)
        .fetch_optional(pool)
        .await
        .map_err(db_err)?;
        let after = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM chat_messages WHERE session_id = ? AND id > ? ORDER BY id ASC LIMIT 1",
        )
        .bind(&message.session_id)
        .bind(message.id)
        .fetch_optional(pool)
        .await
        .map_err(db_err)?;

        Ok(MessageNeighbors {
            before: before.map(Message::try_from).transpose()?,
            after: after.map(Message::try_from).transpose()?,
        })
    }

    async fn recent_sessions(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Session>> {
        let records = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT * FROM chat_sessions
            WHERE user_id = ? AND isolation_token IS NULL
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        into_sessions(records)
    }

    async fn count_sessions(&self, user_id: &str) -> StoreResult<usize> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM chat_sessions WHERE user_id = ? AND isolation_token IS NULL",
        )
        .bind(user_id)
        .fetch_one(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(count.0.max(0) as usize)
    }

    #[instrument(skip(self))]
    async fn recent_user_messages(
        &self,
        user_id: &str,
        exclude_session_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT m.* FROM chat_messages m
            JOIN chat_sessions s ON s.id = m.session_id
            WHERE s.user_id = ?
              AND s.isolation_token IS NULL
              AND m.role = 'user'
              AND (? IS NULL OR m.session_id != ?)
            ORDER BY m.timestamp DESC, m.id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(exclude_session_id)
        .bind(exclude_session_id)
        .bind(limit as i64)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;

        debug!(count = records.len(), "Retrieved recent user messages");
        into_messages(records)
    }

    async fn guest_sessions(&self, isolation_token: &str) -> StoreResult<Vec<Session>> {
        let records = sqlx::query_as::<_, SessionRecord>(
            "SELECT * FROM chat_sessions WHERE isolation_token = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(isolation_token)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        into_sessions(records)
    }
}

#[async_trait]
impl UserStatsStore for SqliteStore {
    async fn user_stats(&self, user_id: &str) -> StoreResult<Option<UserStats>> {
        let record =
            sqlx::query_as::<_, UserStatsRecord>("SELECT * FROM user_stats WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool_manager.pool())
                .await
                .map_err(db_err)?;
        record.map(UserStats::try_from).transpose()
    }

    /// Runs in one transaction that starts with a write, so concurrent turns of the same
    /// user serialize on the SQLite write lock instead of overwriting each other.
    #[instrument(skip(self, turn), fields(intent = %turn.intent))]
    async fn record_turn(
        &self,
        user_id: &str,
        category: UserCategory,
        turn: &TurnStats,
    ) -> StoreResult<UserStats> {
        let mut tx = self.pool_manager.pool().begin().await.map_err(db_err)?;

        let empty = UserStatsRecord::from_stats(&UserStats::new(user_id, category))?;
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_stats
                (user_id, user_category, recent_intents, recent_sentiments, recent_lead_scores, total_messages, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&empty.user_id)
        .bind(&empty.user_category)
        .bind(&empty.recent_intents)
        .bind(&empty.recent_sentiments)
        .bind(&empty.recent_lead_scores)
        .bind(empty.total_messages)
        .bind(empty.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let current =
            sqlx::query_as::<_, UserStatsRecord>("SELECT * FROM user_stats WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err)?;
        let mut stats = UserStats::try_from(current)?;
        stats.category = category;
        stats.record(turn, Utc::now());

        let updated = UserStatsRecord::from_stats(&stats)?;
        sqlx::query(
            r#"
            UPDATE user_stats
            SET user_category = ?, recent_intents = ?, recent_sentiments = ?,
                recent_lead_scores = ?, total_messages = ?, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&updated.user_category)
        .bind(&updated.recent_intents)
        .bind(&updated.recent_sentiments)
        .bind(&updated.recent_lead_scores)
        .bind(updated.total_messages)
        .bind(updated.updated_at)
        .bind(&updated.user_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        debug!(
            user_id = %user_id,
            total_messages = stats.total_messages,
            "Updated user stats"
        );
        Ok(stats)
    }
}
