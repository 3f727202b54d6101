//! # In-Memory Store
//!
//! In-memory implementation of [`MessageStore`] and [`UserStatsStore`] for tests,
//! development and the CLI's `--memory` mode. Data is lost on drop.
//!
//! ## Thread Safety
//!
//! All state sits behind one `Arc<RwLock<_>>`; every write, including the user stats
//! append, happens under a single write guard and is therefore atomic.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use assist_core::{
    Message, MessageNeighbors, MessageStore, NewMessage, NewSession, Role, Session, StoreError,
    StoreResult, TurnStats, UserCategory, UserStats, UserStatsStore,
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    /// Sessions in creation order; the index doubles as the insertion sequence.
    sessions: Vec<Session>,
    messages: BTreeMap<i64, Message>,
    next_message_id: i64,
    user_stats: HashMap<String, UserStats>,
}

impl State {
    fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    fn require_session(&self, session_id: &str) -> StoreResult<()> {
        match self.session(session_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("session {}", session_id))),
        }
    }

    fn append(&mut self, message: NewMessage) -> Message {
        self.next_message_id += 1;
        let message = message.into_message(self.next_message_id);
        self.messages.insert(message.id, message.clone());
        message
    }

    /// Non-guest sessions of a user, newest first (ties: later insertion first).
    fn history_sessions(&self, user_id: &str) -> Vec<(usize, &Session)> {
        let mut sessions: Vec<(usize, &Session)> = self
            .sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| s.user_id == user_id && !s.is_guest())
            .collect();
        sessions.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        sessions
    }
}

/// In-memory session/message store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages across all sessions.
    pub async fn message_count(&self) -> usize {
        self.state.read().await.messages.len()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn create_session(&self, session: NewSession) -> StoreResult<Session> {
        let mut state = self.state.write().await;
        if state.session(&session.id).is_some() {
            return Err(StoreError::AlreadyExists(format!("session {}", session.id)));
        }
        let session = session.into_session();
        state.sessions.push(session.clone());
        debug!(session_id = %session.id, "InMemoryStore: created session");
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> StoreResult<Option<Session>> {
        Ok(self.state.read().await.session(session_id).cloned())
    }

    async fn update_session_title(&self, session_id: &str, title: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| StoreError::NotFound(format!("session {}", session_id)))?;
        session.title = Some(title.to_string());
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != session_id);
        state.messages.retain(|_, m| m.session_id != session_id);
        Ok(state.sessions.len() != before)
    }

    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        state.require_session(&message.session_id)?;
        Ok(state.append(message))
    }

    async fn insert_turn(
        &self,
        user: NewMessage,
        assistant: NewMessage,
    ) -> StoreResult<(Message, Message)> {
        let mut state = self.state.write().await;
        state.require_session(&user.session_id)?;
        state.require_session(&assistant.session_id)?;
        let user = state.append(user);
        let assistant = state.append(assistant);
        Ok((user, assistant))
    }

    async fn get_message(&self, id: i64) -> StoreResult<Option<Message>> {
        Ok(self.state.read().await.messages.get(&id).cloned())
    }

    async fn session_messages(&self, session_id: &str) -> StoreResult<Vec<Message>> {
        let state = self.state.read().await;
        Ok(state
            .messages
            .values()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn message_neighbors(&self, message: &Message) -> StoreResult<MessageNeighbors> {
        let state = self.state.read().await;
        let before = state
            .messages
            .range(..message.id)
            .rev()
            .map(|(_, m)| m)
            .find(|m| m.session_id == message.session_id)
            .cloned();
        let after = state
            .messages
            .range(message.id + 1..)
            .map(|(_, m)| m)
            .find(|m| m.session_id == message.session_id)
            .cloned();
        Ok(MessageNeighbors { before, after })
    }

    async fn recent_sessions(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Session>> {
        let state = self.state.read().await;
        Ok(state
            .history_sessions(user_id)
            .into_iter()
            .take(limit)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn count_sessions(&self, user_id: &str) -> StoreResult<usize> {
        Ok(self.state.read().await.history_sessions(user_id).len())
    }

    async fn recent_user_messages(
        &self,
        user_id: &str,
        exclude_session_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<Message>> {
        let state = self.state.read().await;
        let session_ids: Vec<&str> = state
            .history_sessions(user_id)
            .into_iter()
            .map(|(_, s)| s.id.as_str())
            .filter(|id| Some(*id) != exclude_session_id)
            .collect();
        let mut messages: Vec<&Message> = state
            .messages
            .values()
            .filter(|m| m.role == Role::User && session_ids.contains(&m.session_id.as_str()))
            .collect();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(messages.into_iter().take(limit).cloned().collect())
    }

    async fn guest_sessions(&self, isolation_token: &str) -> StoreResult<Vec<Session>> {
        let state = self.state.read().await;
        let mut sessions: Vec<(usize, &Session)> = state
            .sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| s.isolation_token.as_deref() == Some(isolation_token))
            .collect();
        sessions.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(sessions.into_iter().map(|(_, s)| s.clone()).collect())
    }
}

#[async_trait]
impl UserStatsStore for InMemoryStore {
    async fn user_stats(&self, user_id: &str) -> StoreResult<Option<UserStats>> {
        Ok(self.state.read().await.user_stats.get(user_id).cloned())
    }

    async fn record_turn(
        &self,
        user_id: &str,
        category: UserCategory,
        turn: &TurnStats,
    ) -> StoreResult<UserStats> {
        let mut state = self.state.write().await;
        let stats = state
            .user_stats
            .entry(user_id.to_string())
            .or_insert_with(|| UserStats::new(user_id, category));
        stats.category = category;
        stats.record(turn, Utc::now());
        Ok(stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::Sentiment;
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_round_trip_and_neighbors() {
        let store = InMemoryStore::new();
        store
            .create_session(NewSession::new("u", UserCategory::Student).with_id("a"))
            .await
            .unwrap();
        store
            .create_session(NewSession::new("u", UserCategory::Student).with_id("b"))
            .await
            .unwrap();
        let a1 = store.insert_message(NewMessage::user("a", "a1")).await.unwrap();
        let _b1 = store.insert_message(NewMessage::user("b", "b1")).await.unwrap();
        let a2 = store
            .insert_message(NewMessage::assistant("a", "a2"))
            .await
            .unwrap();

        assert_eq!(store.get_message(a1.id).await.unwrap(), Some(a1.clone()));
        let neighbors = store.message_neighbors(&a1).await.unwrap();
        assert!(neighbors.before.is_none());
        assert_eq!(neighbors.after, Some(a2.clone()));
        let neighbors = store.message_neighbors(&a2).await.unwrap();
        assert_eq!(neighbors.before, Some(a1));
        assert!(neighbors.after.is_none());
    }

    #[tokio::test]
    async fn test_insert_turn_is_all_or_nothing() {
        let store = InMemoryStore::new();
        store
            .create_session(NewSession::new("u", UserCategory::Student).with_id("a"))
            .await
            .unwrap();

        let (user, reply) = store
            .insert_turn(NewMessage::user("a", "q"), NewMessage::assistant("a", "r"))
            .await
            .unwrap();
        assert_eq!(reply.id, user.id + 1);

        let err = store
            .insert_turn(NewMessage::user("a", "q2"), NewMessage::assistant("gone", "r2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.message_count().await, 2);
    }

    #[tokio::test]
    async fn test_history_ordering_and_guest_exclusion() {
        let store = InMemoryStore::new();
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        for (i, id) in ["s0", "s1", "s2"].iter().enumerate() {
            store
                .create_session(
                    NewSession::new("u", UserCategory::Employee)
                        .with_id(*id)
                        .with_created_at(base + Duration::hours(i as i64)),
                )
                .await
                .unwrap();
        }
        store
            .create_session(NewSession::guest(UserCategory::Employee, "t").with_id("g"))
            .await
            .unwrap();
        store.insert_message(NewMessage::user("g", "guest text")).await.unwrap();
        store.insert_message(NewMessage::user("s0", "older")).await.unwrap();
        store.insert_message(NewMessage::user("s2", "newer")).await.unwrap();

        let ids: Vec<String> = store
            .recent_sessions("u", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["s2", "s1", "s0"]);

        let messages = store.recent_user_messages("u", Some("s2"), 200).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "older");
        assert_eq!(store.guest_sessions("t").await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_record_turn_is_atomic() {
        let store = InMemoryStore::new();
        let mut handles = Vec::new();
        for i in 0..20u8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .record_turn(
                        "u",
                        UserCategory::Student,
                        &TurnStats {
                            intent: "library_student".to_string(),
                            sentiment: Sentiment::Neutral,
                            lead_score: i,
                        },
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let stats = store.user_stats("u").await.unwrap().unwrap();
        assert_eq!(stats.total_messages, 20);
        assert_eq!(stats.recent_lead_scores.len(), 10);
    }
}
