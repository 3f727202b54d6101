//! The record moved through the pipeline stages.

use analyzer::BiasReport;
use assist_core::{Classification, Language, Message, UserCategory, UserStats};
use context_strategies::SessionHistory;
use personalization::{fuse, ContextBundle, Personalization};
use prompt::AssembledPrompt;
use serde::Serialize;

use crate::input::{ButtonAction, Signals};
use crate::interactive::InteractiveOptions;
use crate::stage::Stage;
use crate::topic::Topic;

/// Everything a turn starts from. Loaded by the caller before the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnInput {
    pub user_id: String,
    pub session_id: String,
    pub category: UserCategory,
    pub text: String,
    pub language_hint: Option<Language>,
    /// Earlier messages of the current session, oldest first.
    pub history: Vec<Message>,
    pub user_stats: Option<UserStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Completion,
    /// Topic template, used when no completion client is configured or the call failed.
    Template,
    Button,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Completion => "completion",
            ResponseSource::Template => "template",
            ResponseSource::Button => "button",
        }
    }
}

/// State of one turn. Each stage takes it by value and returns it extended.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub input: TurnInput,
    pub stage: Stage,
    pub signals: Signals,
    pub button: Option<ButtonAction>,
    pub classification: Classification,
    pub bias: BiasReport,
    pub topic: Topic,
    pub topic_depth: u32,
    /// Empty until GatherContext has run.
    pub bundle: ContextBundle,
    pub personalization: Option<Personalization>,
    pub prompt: Option<AssembledPrompt>,
    pub response: String,
    pub response_source: ResponseSource,
    /// Why the completion service was not used, when it was configured.
    pub completion_error: Option<String>,
    pub interactive: InteractiveOptions,
    pub suggested_queries: Vec<String>,
    pub requires_followup: bool,
}

impl TurnContext {
    pub fn new(input: TurnInput) -> Self {
        let classification = Classification::neutral(input.language_hint.unwrap_or_default());
        let bundle = fuse(
            SessionHistory::default(),
            Vec::new(),
            Vec::new(),
            classification.clone(),
        );
        Self {
            input,
            stage: Stage::FIRST,
            signals: Signals::default(),
            button: None,
            classification,
            bias: BiasReport::default(),
            topic: Topic::General,
            topic_depth: 0,
            bundle,
            personalization: None,
            prompt: None,
            response: String::new(),
            response_source: ResponseSource::Template,
            completion_error: None,
            interactive: InteractiveOptions::default(),
            suggested_queries: Vec::new(),
            requires_followup: false,
        }
    }

    pub fn is_button(&self) -> bool {
        self.button.is_some()
    }
}
