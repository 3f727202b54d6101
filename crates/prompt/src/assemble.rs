//! Budgeted assembly of the system payload.

use assist_core::{truncate_chars, Message, UserCategory};
use personalization::{ContextBundle, Personalization};
use tracing::debug;

use crate::sections;
use crate::ChatMessage;

/// Default upper bound on the system payload, in characters.
pub const DEFAULT_PROMPT_BUDGET: usize = 12_000;

/// Earlier messages of the current session replayed before the task input.
const CONVERSATION_TAIL: usize = 10;

/// Everything the assembler reads. Borrowed from the pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub current_message: &'a str,
    pub category: UserCategory,
    pub personalization: &'a Personalization,
    pub bundle: &'a ContextBundle,
    /// Earlier messages of the current session, oldest first.
    pub conversation: &'a [Message],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub system: String,
    /// Replayed session turns, oldest first.
    pub conversation: Vec<ChatMessage>,
    pub user: String,
    /// True when entries were dropped or the payload was cut to fit the budget.
    pub truncated: bool,
}

impl AssembledPrompt {
    /// Messages for the completion service: system, replayed turns, then the user message.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.conversation.len() + 2);
        messages.push(ChatMessage::system(self.system.clone()));
        messages.extend(self.conversation.iter().cloned());
        messages.push(ChatMessage::user(self.user.clone()));
        messages
    }

    /// Length of the system payload in characters.
    pub fn system_chars(&self) -> usize {
        self.system.chars().count()
    }
}

/// How many entries of each list are rendered.
#[derive(Debug, Clone, Copy)]
struct Included {
    sessions: usize,
    matches: usize,
    passages: usize,
}

impl Included {
    /// Drops one entry in truncation order; false when nothing is left to drop.
    fn drop_one(&mut self) -> bool {
        for count in [&mut self.sessions, &mut self.passages, &mut self.matches] {
            if *count > 0 {
                *count -= 1;
                return true;
            }
        }
        false
    }
}

fn render(inputs: &PromptInputs<'_>, included: Included) -> String {
    let bundle = inputs.bundle;
    let personalization = inputs.personalization;
    let mut blocks = vec![
        sections::preamble().to_string(),
        sections::profile(inputs.category, personalization, bundle),
    ];
    blocks.extend(sections::sessions(
        &bundle.history.summaries[..included.sessions],
        bundle.history.total_sessions,
    ));
    blocks.extend(sections::similar(&bundle.matches[..included.matches]));
    blocks.extend(sections::knowledge(&bundle.passages[..included.passages]));
    blocks.push(sections::directives(
        bundle.classification.language,
        personalization,
    ));
    blocks.join("\n\n")
}

/// Renders the prompt for one turn. Pure: identical inputs give identical output.
///
/// `budget` bounds the system payload in characters.
pub fn assemble(inputs: &PromptInputs<'_>, budget: usize) -> AssembledPrompt {
    let bundle = inputs.bundle;
    let mut included = Included {
        sessions: bundle.history.summaries.len(),
        matches: bundle.matches.len(),
        passages: bundle.passages.len(),
    };

    let mut truncated = false;
    let mut system = render(inputs, included);
    while system.chars().count() > budget {
        truncated = true;
        if !included.drop_one() {
            system = truncate_chars(&system, budget);
            break;
        }
        system = render(inputs, included);
    }

    debug!(
        chars = system.chars().count(),
        budget,
        sessions = included.sessions,
        matches = included.matches,
        passages = included.passages,
        truncated,
        "Prompt: assembled"
    );

    let skip = inputs.conversation.len().saturating_sub(CONVERSATION_TAIL);
    let conversation = inputs.conversation[skip..]
        .iter()
        .map(|m| ChatMessage {
            role: m.role.into(),
            content: m.content.clone(),
        })
        .collect();

    AssembledPrompt {
        system,
        conversation,
        user: inputs.current_message.to_string(),
        truncated,
    }
}
