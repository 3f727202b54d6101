//! Section renderers. Each returns its block without a trailing blank line.

use std::fmt::Write;

use assist_core::{truncate_chars, Language, Message, UserCategory};
use context_strategies::{SessionSummary, SimilarityMatch};
use knowledge::KnowledgePassage;
use personalization::{ContextBundle, Personalization};

pub const SECTION_PROFILE: &str = "## Current user context";
pub const SECTION_SESSIONS: &str = "## Session history";
pub const SECTION_SIMILAR: &str = "## Similar past conversations";
pub const SECTION_KNOWLEDGE: &str = "## Knowledge base";
pub const SECTION_DIRECTIVES: &str = "## Personalization directives";

/// Address given to users who seem stuck.
pub const SUPPORT_CONTACT: &str = "info@hnu.de";

const PREAMBLE: &str = "You are a warm, empathetic and personalized assistant for HNU \
(Hochschule Neu-Ulm University) in Germany. You remember past conversations and build \
genuine relationships with users.";

/// Characters kept from quoted past messages.
const QUOTE_CHARS: usize = 160;
/// Characters kept from knowledge passages.
const PASSAGE_CHARS: usize = 600;
/// Cached sentiments shown in the profile.
const SENTIMENT_TAIL: usize = 3;

pub(crate) fn preamble() -> &'static str {
    PREAMBLE
}

pub(crate) fn profile(
    category: UserCategory,
    personalization: &Personalization,
    bundle: &ContextBundle,
) -> String {
    let c = &bundle.classification;
    let mut out = String::from(SECTION_PROFILE);
    let _ = write!(out, "\n- User type: {}", category);
    let _ = write!(out, "\n- Preferred language: {}", c.language.display_name());
    let _ = write!(out, "\n- Current tone: {}", personalization.tone);
    let _ = write!(
        out,
        "\n- Sentiment: {} (engagement {}/100)",
        c.sentiment, c.lead_score
    );
    let _ = write!(
        out,
        "\n- Detected intent: {} (confidence {:.2})",
        c.intent, c.confidence
    );
    let _ = write!(out, "\n- Cultural register: {}", personalization.register);

    if let Some(stats) = bundle.user_stats.as_ref().filter(|s| s.is_returning()) {
        let _ = write!(
            out,
            "\n- User patterns: returning user, {} messages so far",
            stats.total_messages
        );
        if let Some(intent) = stats.most_common_intent() {
            let _ = write!(out, "; usually asks about {}", intent);
        }
        let tail = stats.recent_sentiment_tail(SENTIMENT_TAIL);
        if !tail.is_empty() {
            let labels: Vec<&str> = tail.iter().map(|s| s.as_str()).collect();
            let _ = write!(out, "; recent sentiment {}", labels.join(", "));
        }
        if let Some(avg) = stats.average_lead_score() {
            let _ = write!(out, "; average engagement {:.1}", avg);
        }
    }
    out
}

pub(crate) fn sessions(summaries: &[SessionSummary], total_sessions: usize) -> Option<String> {
    if summaries.is_empty() {
        return None;
    }
    let mut out = String::from(SECTION_SESSIONS);
    let _ = write!(
        out,
        "\nTotal sessions: {} (showing {})",
        total_sessions,
        summaries.len()
    );
    for (i, s) in summaries.iter().enumerate() {
        let intents: Vec<&str> = s.intents.iter().map(String::as_str).collect();
        let _ = write!(
            out,
            "\n{}. {} | {} messages | intents: {} | dominant: {} / {} | avg lead score {:.1}",
            i + 1,
            s.created_at.format("%Y-%m-%d"),
            s.message_count,
            if intents.is_empty() {
                "none".to_string()
            } else {
                intents.join(", ")
            },
            s.dominant_intent,
            s.dominant_sentiment,
            s.avg_lead_score
        );
        if let Some(first) = &s.first_message {
            let _ = write!(out, "\n   First topic: \"{}\"", first);
        }
    }
    Some(out)
}

fn quote(message: &Message) -> String {
    truncate_chars(message.content.trim(), QUOTE_CHARS)
}

pub(crate) fn similar(matches: &[SimilarityMatch]) -> Option<String> {
    if matches.is_empty() {
        return None;
    }
    let mut out = String::from(SECTION_SIMILAR);
    for (i, m) in matches.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. Similarity {:.0}% ({})",
            i + 1,
            m.score * 100.0,
            m.session_created_at.format("%Y-%m-%d")
        );
        if let Some(previous) = &m.previous {
            let _ = write!(out, "\n   Before ({}): \"{}\"", previous.role, quote(previous));
        }
        let _ = write!(out, "\n   User: \"{}\"", quote(&m.message));
        let _ = write!(
            out,
            "\n   Intent: {} | Sentiment: {}",
            m.message.intent.as_deref().unwrap_or("n/a"),
            m.sentiment().map(|s| s.as_str()).unwrap_or("n/a")
        );
        if let Some(next) = &m.next {
            let _ = write!(out, "\n   After ({}): \"{}\"", next.role, quote(next));
        }
    }
    Some(out)
}

pub(crate) fn knowledge(passages: &[KnowledgePassage]) -> Option<String> {
    if passages.is_empty() {
        return None;
    }
    let mut out = String::from(SECTION_KNOWLEDGE);
    for (i, p) in passages.iter().enumerate() {
        let _ = write!(out, "\n[{}] (relevance {:.2})", i + 1, p.score);
        if let Some(source) = &p.source {
            let _ = write!(out, " {}", source);
        }
        let _ = write!(out, "\n{}", truncate_chars(p.text.trim(), PASSAGE_CHARS));
    }
    Some(out)
}

pub(crate) fn directives(language: Language, personalization: &Personalization) -> String {
    let mut out = String::from(SECTION_DIRECTIVES);
    let _ = write!(out, "\n- Tone: {}", personalization.tone.guidance());
    let _ = write!(out, "\n- Register: {}", personalization.register.guidance());
    let _ = write!(out, "\n- Trend: {}", personalization.trend.narrative());
    out.push_str("\n- Reference similar past conversations naturally when they help.");
    out.push_str("\n- Do not repeat what the user already knows from earlier sessions.");
    let _ = write!(out, "\n- Respond in {}.", language.display_name());
    out.push_str("\n- Keep it concise (2-4 sentences) and offer a next step.");
    let _ = write!(
        out,
        "\n- Include contact info only if the user seems stuck: {}",
        SUPPORT_CONTACT
    );
    out
}
