//! Conversation topics and topic continuity within a session.

use std::fmt;

use analyzer::intent_category;
use assist_core::{Message, GENERAL_QUERY};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    BachelorPrograms,
    MasterPrograms,
    EmployeeServices,
    StudentServices,
    Partnership,
    #[default]
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::BachelorPrograms => "bachelor_programs",
            Topic::MasterPrograms => "master_programs",
            Topic::EmployeeServices => "employee_services",
            Topic::StudentServices => "student_services",
            Topic::Partnership => "partnership",
            Topic::General => "general",
        }
    }

    /// Topics whose replies usually lead to a follow-up question.
    pub fn invites_continuation(&self) -> bool {
        matches!(self, Topic::BachelorPrograms | Topic::MasterPrograms)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an intent label onto its topic.
pub fn topic_for_intent(intent: &str) -> Topic {
    if intent == GENERAL_QUERY {
        return Topic::General;
    }
    match intent_category(intent) {
        "bachelor_programs" => Topic::BachelorPrograms,
        "master_programs" => Topic::MasterPrograms,
        _ if intent.ends_with("_employee") => Topic::EmployeeServices,
        _ if intent.ends_with("_student") => Topic::StudentServices,
        _ if intent.ends_with("_partner") || intent.starts_with("partnership") => {
            Topic::Partnership
        }
        _ => Topic::General,
    }
}

/// Topic of the latest classified user message of the session and how many turns in a row
/// stayed on it before that (0 for a single turn). `None` when nothing was classified yet.
pub fn previous_topic(history: &[Message]) -> Option<(Topic, u32)> {
    let mut topics = history
        .iter()
        .rev()
        .filter(|m| m.is_analyzed())
        .filter_map(|m| m.intent.as_deref())
        .map(topic_for_intent);
    let latest = topics.next()?;
    let depth = topics.take_while(|t| *t == latest).count();
    Some((latest, u32::try_from(depth).unwrap_or(u32::MAX)))
}

/// Topic and depth of the current turn given the previous one.
pub fn next_topic(previous: Option<(Topic, u32)>, current: Topic) -> (Topic, u32) {
    match previous {
        Some((topic, depth)) if topic == current => (current, depth.saturating_add(1)),
        _ => (current, 0),
    }
}
