//! Input analysis: button responses and surface signals of the raw message.

use analyzer::markers::{has_greeting, has_urgency, is_question};
use analyzer::Tokens;
use serde::Serialize;

/// Prefix of messages produced by clicking an interactive button.
pub const BUTTON_PREFIX: &str = "BTN:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    ShowAllPrograms,
    ApplicationInfo,
    ContactInfo,
    PrerequisitesInfo,
    MoreDetails,
    ContinueTopic,
    ChangeTopic,
    Other(String),
}

impl ButtonAction {
    pub fn parse(action: &str) -> Self {
        match action.trim() {
            "show_all_programs" => ButtonAction::ShowAllPrograms,
            "application_info" => ButtonAction::ApplicationInfo,
            "contact_info" => ButtonAction::ContactInfo,
            "prerequisites_info" => ButtonAction::PrerequisitesInfo,
            "more_details" => ButtonAction::MoreDetails,
            "continue_topic" => ButtonAction::ContinueTopic,
            "change_topic" => ButtonAction::ChangeTopic,
            other => ButtonAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ButtonAction::ShowAllPrograms => "show_all_programs",
            ButtonAction::ApplicationInfo => "application_info",
            ButtonAction::ContactInfo => "contact_info",
            ButtonAction::PrerequisitesInfo => "prerequisites_info",
            ButtonAction::MoreDetails => "more_details",
            ButtonAction::ContinueTopic => "continue_topic",
            ButtonAction::ChangeTopic => "change_topic",
            ButtonAction::Other(action) => action,
        }
    }
}

/// The button action of a `BTN:` message, if it is one.
pub fn parse_button(text: &str) -> Option<ButtonAction> {
    text.trim()
        .strip_prefix(BUTTON_PREFIX)
        .map(ButtonAction::parse)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Signals {
    pub word_count: usize,
    pub is_question: bool,
    pub has_greeting: bool,
    pub has_urgency: bool,
}

impl Signals {
    pub fn of(text: &str) -> Self {
        Self {
            word_count: Tokens::new(text).word_count(),
            is_question: is_question(text),
            has_greeting: has_greeting(text),
            has_urgency: has_urgency(text),
        }
    }
}
