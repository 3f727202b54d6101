//! Turn handling on top of the stores: session checks, persistence and analytics around
//! one [`Pipeline`] run.

use std::sync::Arc;

use assist_core::{
    truncate_chars, Language, Message, MessageStore, NewMessage, NewSession, Role, Session,
    TurnStats, UserCategory, UserStats, UserStatsStore,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::analytics::{AnalyticsRecord, AnalyticsSink, TracingAnalyticsSink};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::Pipeline;
use crate::turn::{TurnContext, TurnInput};

/// Session titles are cut to this many characters.
pub const TITLE_MAX_CHARS: usize = 50;

/// One incoming user message.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub session_id: String,
    pub user_id: String,
    /// Visit token of a guest; `None` for signed-in users.
    pub isolation_token: Option<String>,
    pub text: String,
    pub language_hint: Option<Language>,
    /// The text was picked from the suggested queries.
    pub from_suggestion: bool,
}

impl TurnRequest {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            isolation_token: None,
            text: text.into(),
            language_hint: None,
            from_suggestion: false,
        }
    }

    pub fn with_isolation_token(mut self, token: impl Into<String>) -> Self {
        self.isolation_token = Some(token.into());
        self
    }

    pub fn with_language_hint(mut self, language: Language) -> Self {
        self.language_hint = Some(language);
        self
    }

    pub fn from_suggestion(mut self) -> Self {
        self.from_suggestion = true;
        self
    }
}

/// Result of a handled turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub user_message: Message,
    pub assistant_message: Message,
    pub turn: TurnContext,
}

pub struct Assistant {
    store: Arc<dyn MessageStore>,
    stats: Arc<dyn UserStatsStore>,
    pipeline: Pipeline,
    analytics: Arc<dyn AnalyticsSink>,
}

impl Assistant {
    pub fn new(
        store: Arc<dyn MessageStore>,
        stats: Arc<dyn UserStatsStore>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            store,
            stats,
            pipeline,
            analytics: Arc::new(TracingAnalyticsSink),
        }
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Opens a session. A visit token makes it a guest session.
    pub async fn start_session(
        &self,
        user_id: &str,
        category: UserCategory,
        isolation_token: Option<&str>,
    ) -> PipelineResult<Session> {
        let new_session = match isolation_token {
            Some(token) => NewSession::guest(category, token),
            None => NewSession::new(user_id, category),
        };
        let session = self.store.create_session(new_session).await?;
        info!(session_id = %session.id, guest = session.is_guest(), "Session started");
        Ok(session)
    }

    /// Runs one turn and persists both messages.
    ///
    /// Retrieval and completion problems degrade the reply; store failures while loading
    /// the session or persisting messages fail the turn. Stats and analytics are best effort.
    #[instrument(skip(self, request), fields(session_id = %request.session_id))]
    pub async fn handle_turn(&self, request: TurnRequest) -> PipelineResult<TurnOutcome> {
        let session = self
            .store
            .get_session(&request.session_id)
            .await?
            .ok_or_else(|| PipelineError::SessionNotFound(request.session_id.clone()))?;
        if !session.is_accessible_by(&request.user_id, request.isolation_token.as_deref()) {
            warn!(user_id = %request.user_id, "Session access denied");
            return Err(PipelineError::AccessDenied(session.id));
        }
        if request.text.trim().is_empty() {
            return Err(PipelineError::EmptyMessage);
        }

        let history = self.store.session_messages(&session.id).await?;
        let user_stats = self.load_stats(&session).await;

        let turn = self
            .pipeline
            .run(TurnInput {
                user_id: session.user_id.clone(),
                session_id: session.id.clone(),
                category: session.category,
                text: request.text.clone(),
                language_hint: request.language_hint,
                history: history.clone(),
                user_stats,
            })
            .await;

        let mut user_message = NewMessage::user(&session.id, request.text.as_str())
            .with_classification(&turn.classification);
        if request.from_suggestion || turn.is_button() {
            user_message = user_message.as_suggestion();
        }
        let (user_message, assistant_message) = self
            .store
            .insert_turn(
                user_message,
                NewMessage::assistant(&session.id, turn.response.as_str()),
            )
            .await?;

        let first_user_message = !history.iter().any(|m| m.role == Role::User);
        if session.title.is_none() && first_user_message && !turn.is_button() {
            let title = truncate_chars(request.text.trim(), TITLE_MAX_CHARS);
            if let Err(e) = self.store.update_session_title(&session.id, &title).await {
                warn!(error = %e, "Failed to set session title");
            }
        }

        if !session.is_guest() {
            let stats = TurnStats {
                intent: turn.classification.intent.clone(),
                sentiment: turn.classification.sentiment,
                lead_score: turn.classification.lead_score,
            };
            if let Err(e) = self
                .stats
                .record_turn(&session.user_id, session.category, &stats)
                .await
            {
                warn!(error = %e, "Failed to update user stats");
            }
        }

        let record = AnalyticsRecord::from_turn(&turn, Utc::now());
        if let Err(e) = self.analytics.record(&record).await {
            warn!(error = %e, "Failed to record analytics");
        }

        Ok(TurnOutcome {
            reply: turn.response.clone(),
            user_message,
            assistant_message,
            turn,
        })
    }

    async fn load_stats(&self, session: &Session) -> Option<UserStats> {
        if session.is_guest() {
            return None;
        }
        match self.stats.user_stats(&session.user_id).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Failed to load user stats, continuing without them");
                None
            }
        }
    }
}
