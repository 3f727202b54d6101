//! # Pipeline
//!
//! Orchestrates one conversational turn. A [`Pipeline`] moves a [`TurnContext`] through the
//! stages in [`Stage`] order: input analysis, intent classification, topic detection,
//! concurrent context gathering, personalized generation, interactive elements and
//! finalization. [`Assistant`] wraps it with session access checks, persistence, the user
//! stats cache and analytics.
//!
//! Retrieval strategies run concurrently, each under its own timeout; a failing or slow
//! strategy only leaves its part of the context empty. A missing or failing completion
//! client falls back to topic templates.

mod analytics;
mod assistant;
mod config;
mod error;
mod input;
mod interactive;
mod pipeline;
mod stage;
mod templates;
mod topic;
mod turn;

pub use analytics::{AnalyticsRecord, AnalyticsSink, JsonlAnalyticsSink, TracingAnalyticsSink};
pub use assistant::{Assistant, TurnOutcome, TurnRequest, TITLE_MAX_CHARS};
pub use config::{
    EnvPipelineConfig, DEFAULT_COMPLETION_TIMEOUT_SECS, DEFAULT_FOLLOWUP_CONFIDENCE,
    DEFAULT_RETRIEVAL_TIMEOUT_MS,
};
pub use error::{PipelineError, PipelineResult};
pub use input::{parse_button, ButtonAction, Signals, BUTTON_PREFIX};
pub use interactive::{interactive_options, suggested_queries, Button, InteractiveOptions};
pub use pipeline::Pipeline;
pub use stage::Stage;
pub use templates::{button_response, error_response, topic_response};
pub use topic::{next_topic, previous_topic, topic_for_intent, Topic};
pub use turn::{ResponseSource, TurnContext, TurnInput};
