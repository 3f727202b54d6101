//! Buttons and suggested follow-up queries offered with a reply.

use assist_core::UserCategory;
use serde::Serialize;

use crate::input::ButtonAction;
use crate::topic::Topic;

/// Category-specific queries appended to the topic suggestions.
const CATEGORY_SUGGESTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    pub action: String,
}

impl Button {
    fn new(text: &str, action: ButtonAction) -> Self {
        Self {
            text: text.to_string(),
            action: action.as_str().to_string(),
        }
    }

    /// Message sent back when the button is clicked.
    pub fn payload(&self) -> String {
        format!("{}{}", crate::input::BUTTON_PREFIX, self.action)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InteractiveOptions {
    pub buttons: Vec<Button>,
    /// The reply expects the user to keep going on the same topic.
    pub continue_conversation: bool,
}

pub fn interactive_options(topic: Topic, depth: u32) -> InteractiveOptions {
    use ButtonAction::*;

    match (topic, depth) {
        (Topic::BachelorPrograms, 0) => InteractiveOptions {
            buttons: vec![
                Button::new("Show All Programs", ShowAllPrograms),
                Button::new("Application Info", ApplicationInfo),
                Button::new("Contact Admissions", ContactInfo),
            ],
            continue_conversation: topic.invites_continuation(),
        },
        (Topic::MasterPrograms, 0) => InteractiveOptions {
            buttons: vec![
                Button::new("Show All Programs", ShowAllPrograms),
                Button::new("Application Info", ApplicationInfo),
                Button::new("Prerequisites", PrerequisitesInfo),
            ],
            continue_conversation: topic.invites_continuation(),
        },
        (Topic::EmployeeServices | Topic::StudentServices, 0) => InteractiveOptions {
            buttons: vec![
                Button::new("Contact Info", ContactInfo),
                Button::new("More Services", MoreDetails),
            ],
            continue_conversation: false,
        },
        (_, depth) if depth > 0 => InteractiveOptions {
            buttons: vec![
                Button::new("Continue Topic", ContinueTopic),
                Button::new("Change Topic", ChangeTopic),
            ],
            continue_conversation: false,
        },
        _ => InteractiveOptions::default(),
    }
}

fn topic_queries(topic: Topic, depth: u32) -> &'static [&'static str] {
    match (topic, depth) {
        (Topic::BachelorPrograms, 0) => &[
            "Show me all bachelor program names",
            "What are the admission requirements?",
            "Which programs are taught in English?",
            "How long do bachelor programs take?",
        ],
        (Topic::BachelorPrograms, _) => &[
            "Tell me more about Business Administration",
            "What are the career prospects?",
            "How do I apply for these programs?",
            "What are the semester fees?",
        ],
        (Topic::MasterPrograms, _) => &[
            "Show me all master program names",
            "What are the prerequisites for master programs?",
            "Which master programs are available in English?",
            "How do master programs differ from bachelor?",
        ],
        (Topic::EmployeeServices, _) => &[
            "I need IT support",
            "How do I book a meeting room?",
            "HR contact information",
            "Password reset help",
        ],
        (Topic::StudentServices, _) => &[
            "How do I enroll in courses?",
            "I need my transcript",
            "Library opening hours",
            "Academic counseling",
        ],
        (Topic::Partnership | Topic::General, _) => &[],
    }
}

fn category_queries(category: UserCategory) -> &'static [&'static str] {
    match category.corpus_category() {
        UserCategory::Employee | UserCategory::Admin => {
            &["IT support contact", "Room booking", "HR services", "VPN setup"]
        }
        UserCategory::Student => &[
            "Course enrollment",
            "Transcript request",
            "Library services",
            "Academic support",
        ],
        UserCategory::Partner => &[
            "Partnership opportunities",
            "Event planning",
            "Facility rental",
            "Collaboration options",
        ],
    }
}

/// Topic queries for the current depth followed by two queries for the user's category.
pub fn suggested_queries(topic: Topic, depth: u32, category: UserCategory) -> Vec<String> {
    topic_queries(topic, depth)
        .iter()
        .chain(category_queries(category).iter().take(CATEGORY_SUGGESTIONS))
        .map(|q| q.to_string())
        .collect()
}
