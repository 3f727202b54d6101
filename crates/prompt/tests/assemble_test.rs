//! Tests for `prompt::assemble`: section order, determinism and budget truncation.

use std::collections::BTreeSet;

use assist_core::{
    Classification, Language, Message, Role, Sentiment, TurnStats, UserCategory, UserStats,
};
use chrono::{Duration, TimeZone, Utc};
use context_strategies::{SessionHistory, SessionSummary, SimilarityMatch};
use knowledge::KnowledgePassage;
use personalization::{
    fuse, ContextBundle, CulturalRegister, Formality, Personalization, SentimentTrend, Tone,
};
use prompt::{
    assemble, ChatMessage, MessageRole, PromptInputs, DEFAULT_PROMPT_BUDGET, SECTION_DIRECTIVES,
    SECTION_KNOWLEDGE, SECTION_PROFILE, SECTION_SESSIONS, SECTION_SIMILAR, SUPPORT_CONTACT,
};

fn message(id: i64, role: Role, text: &str) -> Message {
    Message {
        id,
        session_id: "old".to_string(),
        role,
        content: text.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + Duration::minutes(id),
        intent: (role == Role::User).then(|| "enrollment_student".to_string()),
        sentiment: (role == Role::User).then_some(Sentiment::Neutral),
        lead_score: None,
        is_suggestion: false,
    }
}

fn summary(index: i64) -> SessionSummary {
    SessionSummary {
        session_id: format!("session-{}", index),
        created_at: Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap() - Duration::days(index),
        category: UserCategory::Student,
        title: None,
        message_count: 4,
        analyzed_count: 2,
        intents: BTreeSet::from(["enrollment_student".to_string()]),
        dominant_intent: "enrollment_student".to_string(),
        dominant_sentiment: Sentiment::Neutral,
        avg_lead_score: 62.5,
        first_message: Some(format!("topic-{}", index)),
    }
}

fn matched(id: i64, score: f64, text: &str) -> SimilarityMatch {
    let msg = message(id, Role::User, text);
    SimilarityMatch {
        score,
        session_id: msg.session_id.clone(),
        session_created_at: msg.timestamp,
        previous: None,
        next: Some(message(id + 1, Role::Assistant, "Use the enrollment portal.")),
        message: msg,
    }
}

fn passage(id: &str, score: f32) -> KnowledgePassage {
    KnowledgePassage {
        passage_id: id.to_string(),
        text: format!("passage-{} text", id),
        score,
        source: Some("handbook".to_string()),
        language: Some(Language::En),
    }
}

fn history(count: i64) -> SessionHistory {
    SessionHistory {
        summaries: (0..count).map(summary).collect(),
        total_sessions: 3,
    }
}

fn classification(language: Language) -> Classification {
    Classification {
        language,
        intent: "enrollment_student".to_string(),
        confidence: 0.82,
        sentiment: Sentiment::Neutral,
        lead_score: 93,
    }
}

fn bundle(sessions: i64, matches: usize, passages: usize) -> ContextBundle {
    let all_matches = vec![
        matched(10, 0.9, "match-best enroll"),
        matched(20, 0.5, "match-worst enroll"),
    ];
    let all_passages = vec![passage("top", 0.8), passage("low", 0.3)];
    fuse(
        history(sessions),
        all_matches.into_iter().take(matches).collect(),
        all_passages.into_iter().take(passages).collect(),
        classification(Language::En),
    )
}

fn personalization() -> Personalization {
    Personalization {
        tone: Tone::Curious,
        register: CulturalRegister {
            language: Language::En,
            formality: Formality::Balanced,
        },
        trend: SentimentTrend::NoTrend,
    }
}

fn inputs<'a>(
    bundle: &'a ContextBundle,
    personalization: &'a Personalization,
    conversation: &'a [Message],
) -> PromptInputs<'a> {
    PromptInputs {
        current_message: "How do I enroll for summer semester?",
        category: UserCategory::Student,
        personalization,
        bundle,
        conversation,
    }
}

fn system_of(bundle: &ContextBundle) -> String {
    let p = personalization();
    assemble(&inputs(bundle, &p, &[]), DEFAULT_PROMPT_BUDGET).system
}

#[test]
fn test_sections_in_fixed_order() {
    let system = system_of(&bundle(3, 2, 2));
    let positions: Vec<usize> = [
        SECTION_PROFILE,
        SECTION_SESSIONS,
        SECTION_SIMILAR,
        SECTION_KNOWLEDGE,
        SECTION_DIRECTIVES,
    ]
    .iter()
    .map(|title| system.find(title).expect("section present"))
    .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);

    assert!(system.find("match-best").unwrap() < system.find("match-worst").unwrap());
    assert!(system.find("passage-top").unwrap() < system.find("passage-low").unwrap());
    assert!(system.contains("Similarity 90%"));
    assert!(system.contains("Total sessions: 3 (showing 3)"));
    assert!(system.contains(SUPPORT_CONTACT));
}

#[test]
fn test_assembly_is_deterministic() {
    let b = bundle(3, 2, 2);
    let p = personalization();
    let first = assemble(&inputs(&b, &p, &[]), DEFAULT_PROMPT_BUDGET);
    let second = assemble(&inputs(&b, &p, &[]), DEFAULT_PROMPT_BUDGET);
    assert_eq!(first, second);
    assert!(!first.truncated);
}

#[test]
fn test_empty_sections_are_omitted() {
    let system = system_of(&bundle(0, 0, 0));
    assert!(system.contains(SECTION_PROFILE));
    assert!(system.contains(SECTION_DIRECTIVES));
    assert!(!system.contains(SECTION_SESSIONS));
    assert!(!system.contains(SECTION_SIMILAR));
    assert!(!system.contains(SECTION_KNOWLEDGE));
}

#[test]
fn test_budget_drops_oldest_session_first() {
    let full = bundle(3, 2, 2);
    let expected = system_of(&ContextBundle {
        history: SessionHistory {
            summaries: history(3).summaries[..2].to_vec(),
            total_sessions: 3,
        },
        ..full.clone()
    });

    let p = personalization();
    let prompt = assemble(&inputs(&full, &p, &[]), expected.chars().count());
    assert!(prompt.truncated);
    assert_eq!(prompt.system, expected);
    assert!(prompt.system.contains("topic-0"));
    assert!(!prompt.system.contains("topic-2"));
}

#[test]
fn test_budget_then_drops_passages_then_matches() {
    let full = bundle(3, 2, 2);
    let p = personalization();

    let without_low_passage = system_of(&bundle(0, 2, 1));
    let prompt = assemble(&inputs(&full, &p, &[]), without_low_passage.chars().count());
    assert_eq!(prompt.system, without_low_passage);
    assert!(prompt.system.contains("match-worst"));

    let best_match_only = system_of(&bundle(0, 1, 0));
    let prompt = assemble(&inputs(&full, &p, &[]), best_match_only.chars().count());
    assert_eq!(prompt.system, best_match_only);
    assert!(!prompt.system.contains(SECTION_KNOWLEDGE));
}

#[test]
fn test_budget_hard_cut_is_an_upper_bound() {
    let full = bundle(3, 2, 2);
    let p = personalization();
    let prompt = assemble(&inputs(&full, &p, &[]), 50);
    assert_eq!(prompt.system_chars(), 50);
    assert!(prompt.truncated);
    assert!(prompt.system.starts_with("You are a warm"));

    let empty = assemble(&inputs(&full, &p, &[]), 0);
    assert!(empty.system.is_empty());
}

#[test]
fn test_messages_replay_session_tail() {
    let b = bundle(0, 0, 0);
    let p = personalization();
    let conversation: Vec<Message> = (0..12)
        .map(|i| {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            message(i, role, &format!("turn-{}", i))
        })
        .collect();

    let prompt = assemble(&inputs(&b, &p, &conversation), DEFAULT_PROMPT_BUDGET);
    let messages = prompt.messages();

    assert_eq!(messages.len(), 12);
    assert_eq!(messages[0].role, MessageRole::System);
    assert_eq!(messages[1], ChatMessage::user("turn-2"));
    assert_eq!(messages[2], ChatMessage::assistant("turn-3"));
    assert_eq!(
        messages.last(),
        Some(&ChatMessage::user("How do I enroll for summer semester?"))
    );
}

#[test]
fn test_profile_patterns_only_for_returning_users() {
    let p = personalization();
    let mut stats = UserStats::new("alice", UserCategory::Student);
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let turn = TurnStats {
        intent: "library_student".to_string(),
        sentiment: Sentiment::Negative,
        lead_score: 40,
    };
    stats.record(&turn, at);

    let b = bundle(0, 0, 0).with_user_stats(Some(stats.clone()));
    let system = assemble(&inputs(&b, &p, &[]), DEFAULT_PROMPT_BUDGET).system;
    assert!(!system.contains("User patterns"));

    stats.record(&turn, at);
    let b = bundle(0, 0, 0).with_user_stats(Some(stats));
    let system = assemble(&inputs(&b, &p, &[]), DEFAULT_PROMPT_BUDGET).system;
    assert!(system.contains("User patterns: returning user, 2 messages so far"));
    assert!(system.contains("usually asks about library_student"));
    assert!(system.contains("average engagement 40.0"));
}

#[test]
fn test_reply_language_follows_classification() {
    let mut b = bundle(0, 0, 0);
    b.classification = classification(Language::De);
    let system = system_of(&b);
    assert!(system.contains("Respond in German."));
    assert!(system.contains("Preferred language: German"));
}
