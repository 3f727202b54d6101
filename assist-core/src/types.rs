//! Domain types: roles, user categories, languages, sentiment labels, messages, sessions
//! and the per-message classification tuple.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseLabelError;

/// Shared placeholder user id for unauthenticated visitors; sessions are told apart by
/// their isolation token.
pub const GUEST_USER_ID: &str = "guest";

/// Reserved intent label returned when no reference sample is similar enough.
pub const GENERAL_QUERY: &str = "general_query";

/// Dominant intent of a session without any classified user message.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(ParseLabelError::new("role", other)),
        }
    }
}

/// Kind of account a session belongs to. Drives corpus selection, lead-score weighting and
/// suggested queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserCategory {
    Student,
    Employee,
    Partner,
    Admin,
}

impl UserCategory {
    pub const ALL: [UserCategory; 4] = [
        UserCategory::Student,
        UserCategory::Employee,
        UserCategory::Partner,
        UserCategory::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserCategory::Student => "student",
            UserCategory::Employee => "employee",
            UserCategory::Partner => "partner",
            UserCategory::Admin => "admin",
        }
    }

    /// Category whose reference corpus and suggestions apply. Admins are served as employees.
    pub fn corpus_category(&self) -> UserCategory {
        match self {
            UserCategory::Admin => UserCategory::Employee,
            other => *other,
        }
    }
}

impl fmt::Display for UserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserCategory {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(UserCategory::Student),
            "employee" => Ok(UserCategory::Employee),
            "partner" => Ok(UserCategory::Partner),
            "admin" => Ok(UserCategory::Admin),
            other => Err(ParseLabelError::new("user category", other)),
        }
    }
}

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "German",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "de" | "german" | "deutsch" => Ok(Language::De),
            other => Err(ParseLabelError::new("language", other)),
        }
    }
}

/// Polarity label of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(ParseLabelError::new("sentiment", other)),
        }
    }
}

/// Classification of one message as produced by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub language: Language,
    pub intent: String,
    /// Intent confidence in [0, 1].
    pub confidence: f32,
    pub sentiment: Sentiment,
    /// Engagement/urgency estimate in [0, 100].
    pub lead_score: u8,
}

impl Classification {
    /// Neutral tuple used for empty input and as the degraded default.
    pub fn neutral(language: Language) -> Self {
        Self {
            language,
            intent: GENERAL_QUERY.to_string(),
            confidence: 0.0,
            sentiment: Sentiment::Neutral,
            lead_score: 50,
        }
    }
}

/// A persisted message. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned, strictly increasing; orders messages within a session.
    pub id: i64,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub intent: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub lead_score: Option<u8>,
    pub is_suggestion: bool,
}

impl Message {
    /// True for user messages that carry both an intent and a sentiment.
    pub fn is_analyzed(&self) -> bool {
        self.role == Role::User && self.intent.is_some() && self.sentiment.is_some()
    }
}

/// A message about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub intent: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub lead_score: Option<u8>,
    pub is_suggestion: bool,
}

impl NewMessage {
    pub fn new(session_id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            intent: None,
            sentiment: None,
            lead_score: None,
            is_suggestion: false,
        }
    }

    pub fn user(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(session_id, Role::User, content)
    }

    pub fn assistant(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(session_id, Role::Assistant, content)
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_lead_score(mut self, lead_score: u8) -> Self {
        self.lead_score = Some(lead_score.min(100));
        self
    }

    /// Attaches intent, sentiment and lead score from an analyzer result.
    pub fn with_classification(self, classification: &Classification) -> Self {
        self.with_intent(classification.intent.clone())
            .with_sentiment(classification.sentiment)
            .with_lead_score(classification.lead_score)
    }

    pub fn as_suggestion(mut self) -> Self {
        self.is_suggestion = true;
        self
    }

    /// Materializes the stored message once the store has assigned an id.
    pub fn into_message(self, id: i64) -> Message {
        Message {
            id,
            session_id: self.session_id,
            role: self.role,
            content: self.content,
            timestamp: self.timestamp,
            intent: self.intent,
            sentiment: self.sentiment,
            lead_score: self.lead_score,
            is_suggestion: self.is_suggestion,
        }
    }
}

/// Conversation container. Messages are fetched separately, ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub category: UserCategory,
    /// Per-visit token of guest sessions; `None` for signed-in users.
    pub isolation_token: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_guest(&self) -> bool {
        self.isolation_token.is_some()
    }

    /// Signed-in users may open their own sessions; guests only sessions of their own visit.
    pub fn is_accessible_by(&self, user_id: &str, isolation_token: Option<&str>) -> bool {
        match (&self.isolation_token, isolation_token) {
            (Some(own), Some(given)) => own == given,
            (Some(_), None) => false,
            (None, _) => self.user_id == user_id && user_id != GUEST_USER_ID,
        }
    }
}

/// A session about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub id: String,
    pub user_id: String,
    pub category: UserCategory,
    pub isolation_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewSession {
    /// Session for a signed-in user with a generated id.
    pub fn new(user_id: impl Into<String>, category: UserCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            category,
            isolation_token: None,
            created_at: Utc::now(),
        }
    }

    /// Session for a guest visit; the user id is the shared placeholder.
    pub fn guest(category: UserCategory, isolation_token: impl Into<String>) -> Self {
        Self {
            isolation_token: Some(isolation_token.into()),
            ..Self::new(GUEST_USER_ID, category)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn into_session(self) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            category: self.category,
            isolation_token: self.isolation_token,
            title: None,
            created_at: self.created_at,
        }
    }
}
