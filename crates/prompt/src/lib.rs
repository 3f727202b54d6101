//! # Prompt
//!
//! Renders the fused context of one turn into the instruction payload for the completion
//! service.
//!
//! ## Format
//!
//! The system payload is made of these sections, always in this order:
//!
//! - **Profile**: user type, language, tone, sentiment, intent, cultural register, cached patterns
//! - **Session analytics**: one line per recent session, most recent first
//! - **Similar conversations**: past user messages with their neighbours, best first
//! - **Knowledge**: retrieved passages, best first
//! - **Directives**: tone, register and trend guidance plus reply rules
//!
//! Empty middle sections are omitted. The plain user message is the task input.
//!
//! ## Budget
//!
//! The system payload never exceeds the character budget given to [`assemble`]. Entries are
//! dropped oldest session first, then lowest-ranked passage, then lowest-ranked match; a
//! payload still over budget is cut at a char boundary.

mod assemble;
mod sections;

pub use assemble::{assemble, AssembledPrompt, PromptInputs, DEFAULT_PROMPT_BUDGET};
pub use sections::{
    SECTION_DIRECTIVES, SECTION_KNOWLEDGE, SECTION_PROFILE, SECTION_SESSIONS, SECTION_SIMILAR,
    SUPPORT_CONTACT,
};

use assist_core::Role;

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}
