//! Persistence seams consumed by the retrievers and the pipeline.
//!
//! Implemented by `storage` (SQLite) and `store-inmemory`. All reads must observe writes
//! previously committed by the same process.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Message, NewMessage, NewSession, Session, UserCategory};
use crate::user_stats::{TurnStats, UserStats};

/// Messages directly before and after a message within its session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageNeighbors {
    pub before: Option<Message>,
    pub after: Option<Message>,
}

/// Session and message store.
///
/// History queries (`recent_sessions`, `count_sessions`, `recent_user_messages`) only see
/// sessions without an isolation token; guest visits are reachable through `guest_sessions`.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create_session(&self, session: NewSession) -> StoreResult<Session>;

    async fn get_session(&self, session_id: &str) -> StoreResult<Option<Session>>;

    async fn update_session_title(&self, session_id: &str, title: &str) -> StoreResult<()>;

    /// Deletes a session with all of its messages. Returns false if it did not exist.
    async fn delete_session(&self, session_id: &str) -> StoreResult<bool>;

    /// Appends a message to an existing session and returns it with its assigned id.
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message>;

    /// Stores a user message and its reply together: either both are saved or neither is.
    async fn insert_turn(
        &self,
        user: NewMessage,
        assistant: NewMessage,
    ) -> StoreResult<(Message, Message)>;

    async fn get_message(&self, id: i64) -> StoreResult<Option<Message>>;

    /// All messages of a session in insertion order.
    async fn session_messages(&self, session_id: &str) -> StoreResult<Vec<Message>>;

    async fn message_neighbors(&self, message: &Message) -> StoreResult<MessageNeighbors>;

    /// Up to `limit` sessions of the user, newest first.
    async fn recent_sessions(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Session>>;

    async fn count_sessions(&self, user_id: &str) -> StoreResult<usize>;

    /// Up to `limit` user-authored messages of the user, newest first, skipping
    /// `exclude_session_id`.
    async fn recent_user_messages(
        &self,
        user_id: &str,
        exclude_session_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<Message>>;

    /// Sessions of one guest visit, newest first.
    async fn guest_sessions(&self, isolation_token: &str) -> StoreResult<Vec<Session>>;
}

/// Store for the [`UserStats`] cache.
#[async_trait]
pub trait UserStatsStore: Send + Sync {
    async fn user_stats(&self, user_id: &str) -> StoreResult<Option<UserStats>>;

    /// Appends one turn and increments the message count as a single atomic update.
    async fn record_turn(
        &self,
        user_id: &str,
        category: UserCategory,
        turn: &TurnStats,
    ) -> StoreResult<UserStats>;
}
