//! Shared test utilities for pipeline integration tests.
//!
//! Mock strategies, completion clients, a store wrapper that fails on demand and a sink that
//! keeps analytics records in memory.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use analyzer::MessageAnalyzer;
use assist_core::{
    Message, MessageNeighbors, MessageStore, NewMessage, NewSession, Session, StoreError,
    StoreResult, TurnStats, UserCategory, UserStats, UserStatsStore,
};
use async_trait::async_trait;
use context_strategies::{ContextRequest, ContextStrategy, StrategyResult};
use llm_client::{CompletionError, CompletionOptions, LlmClient};
use pipeline::{
    AnalyticsRecord, AnalyticsSink, Assistant, EnvPipelineConfig, Pipeline, TurnInput,
};
use prompt::ChatMessage;
use store_inmemory::InMemoryStore;

pub fn analyzer() -> MessageAnalyzer {
    MessageAnalyzer::builtin().expect("builtin corpus")
}

pub fn fast_config() -> EnvPipelineConfig {
    EnvPipelineConfig {
        retrieval_timeout: Duration::from_millis(100),
        completion_timeout: Duration::from_millis(200),
        ..EnvPipelineConfig::default()
    }
}

pub fn input(text: &str) -> TurnInput {
    TurnInput {
        user_id: "alice".to_string(),
        session_id: "s-current".to_string(),
        category: UserCategory::Student,
        text: text.to_string(),
        language_hint: None,
        history: Vec::new(),
        user_stats: None,
    }
}

/// An analyzed user message of the current session carrying `intent`.
pub fn analyzed(id: i64, text: &str, intent: &str) -> Message {
    NewMessage::user("s-current", text)
        .with_intent(intent)
        .with_sentiment(assist_core::Sentiment::Neutral)
        .with_lead_score(50)
        .into_message(id)
}

/// Never finishes within any test timeout.
pub struct SlowStrategy {
    pub delay: Duration,
}

#[async_trait]
impl ContextStrategy for SlowStrategy {
    fn name(&self) -> &str {
        "SlowStrategy"
    }

    async fn build_context(
        &self,
        _request: &ContextRequest<'_>,
    ) -> Result<StrategyResult, anyhow::Error> {
        tokio::time::sleep(self.delay).await;
        Ok(StrategyResult::Knowledge(Vec::new()))
    }
}

pub struct FailingStrategy;

#[async_trait]
impl ContextStrategy for FailingStrategy {
    fn name(&self) -> &str {
        "FailingStrategy"
    }

    async fn build_context(
        &self,
        _request: &ContextRequest<'_>,
    ) -> Result<StrategyResult, anyhow::Error> {
        Err(anyhow::anyhow!("index unavailable"))
    }
}

pub enum LlmBehavior {
    Reply(String),
    Fail,
    Slow(Duration),
}

/// Completion client with scripted behavior that records every request.
pub struct MockLlm {
    behavior: LlmBehavior,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlm {
    pub fn new(behavior: LlmBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::new(LlmBehavior::Reply(reply.to_string()))
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        match &self.behavior {
            LlmBehavior::Reply(reply) => Ok(reply.clone()),
            LlmBehavior::Fail => Err(CompletionError::Request(anyhow::anyhow!("HTTP 500"))),
            LlmBehavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("too late".to_string())
            }
        }
    }
}

/// Delegates to an [`InMemoryStore`]; writes fail while `fail_writes` is set and stats
/// calls fail while `fail_stats` is set.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    pub fail_writes: AtomicBool,
    pub fail_stats: AtomicBool,
    pub record_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("disk I/O error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageStore for FlakyStore {
    async fn create_session(&self, session: NewSession) -> StoreResult<Session> {
        self.inner.create_session(session).await
    }

    async fn get_session(&self, session_id: &str) -> StoreResult<Option<Session>> {
        self.inner.get_session(session_id).await
    }

    async fn update_session_title(&self, session_id: &str, title: &str) -> StoreResult<()> {
        self.inner.update_session_title(session_id, title).await
    }

    async fn delete_session(&self, session_id: &str) -> StoreResult<bool> {
        self.inner.delete_session(session_id).await
    }

    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        self.check_write()?;
        self.inner.insert_message(message).await
    }

    async fn insert_turn(
        &self,
        user: NewMessage,
        assistant: NewMessage,
    ) -> StoreResult<(Message, Message)> {
        self.check_write()?;
        self.inner.insert_turn(user, assistant).await
    }

    async fn get_message(&self, id: i64) -> StoreResult<Option<Message>> {
        self.inner.get_message(id).await
    }

    async fn session_messages(&self, session_id: &str) -> StoreResult<Vec<Message>> {
        self.inner.session_messages(session_id).await
    }

    async fn message_neighbors(&self, message: &Message) -> StoreResult<MessageNeighbors> {
        self.inner.message_neighbors(message).await
    }

    async fn recent_sessions(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Session>> {
        self.inner.recent_sessions(user_id, limit).await
    }

    async fn count_sessions(&self, user_id: &str) -> StoreResult<usize> {
        self.inner.count_sessions(user_id).await
    }

    async fn recent_user_messages(
        &self,
        user_id: &str,
        exclude_session_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<Message>> {
        self.inner
            .recent_user_messages(user_id, exclude_session_id, limit)
            .await
    }

    async fn guest_sessions(&self, isolation_token: &str) -> StoreResult<Vec<Session>> {
        self.inner.guest_sessions(isolation_token).await
    }
}

#[async_trait]
impl UserStatsStore for FlakyStore {
    async fn user_stats(&self, user_id: &str) -> StoreResult<Option<UserStats>> {
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(StoreError::Database("stats table locked".to_string()));
        }
        self.inner.user_stats(user_id).await
    }

    async fn record_turn(
        &self,
        user_id: &str,
        category: UserCategory,
        turn: &TurnStats,
    ) -> StoreResult<UserStats> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(StoreError::Database("stats table locked".to_string()));
        }
        self.inner.record_turn(user_id, category, turn).await
    }
}

/// Keeps every record; fails on demand.
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<AnalyticsRecord>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl AnalyticsSink for RecordingSink {
    async fn record(&self, record: &AnalyticsRecord) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("sink closed");
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// An assistant over a [`FlakyStore`] with retrieval wired to the same store.
pub fn assistant(store: Arc<FlakyStore>, sink: Arc<RecordingSink>) -> Assistant {
    let pipeline = Pipeline::new(analyzer(), fast_config()).with_store(store.clone());
    Assistant::new(store.clone(), store, pipeline).with_analytics(sink)
}
