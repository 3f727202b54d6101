use chrono::Utc;

use crate::types::{Sentiment, UserCategory};
use crate::user_stats::{TurnStats, UserStats, USER_STATS_CAPACITY};

fn turn(i: usize) -> TurnStats {
    TurnStats {
        intent: format!("intent_{}", i),
        sentiment: if i % 2 == 0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        },
        lead_score: (i % 20 * 5) as u8,
    }
}

#[test]
fn test_fifo_eviction_after_eleven_appends() {
    let mut stats = UserStats::new("u1", UserCategory::Student);
    for i in 0..11 {
        stats.record(&turn(i), Utc::now());
    }

    assert_eq!(stats.recent_intents.len(), USER_STATS_CAPACITY);
    assert_eq!(stats.recent_sentiments.len(), USER_STATS_CAPACITY);
    assert_eq!(stats.recent_lead_scores.len(), USER_STATS_CAPACITY);
    assert_eq!(stats.recent_intents.front().map(String::as_str), Some("intent_1"));
    assert_eq!(stats.recent_intents.back().map(String::as_str), Some("intent_10"));
    assert_eq!(stats.total_messages, 11);
}

#[test]
fn test_capacity_holds_for_many_appends() {
    let mut stats = UserStats::new("u1", UserCategory::Partner);
    for i in 0..57 {
        stats.record(&turn(i), Utc::now());
        assert!(stats.recent_intents.len() <= USER_STATS_CAPACITY);
        assert!(stats.recent_sentiments.len() <= USER_STATS_CAPACITY);
        assert!(stats.recent_lead_scores.len() <= USER_STATS_CAPACITY);
    }
    assert_eq!(stats.recent_lead_scores.back().copied(), Some(80));
}

#[test]
fn test_most_common_intent_prefers_recent_on_tie() {
    let mut stats = UserStats::new("u1", UserCategory::Student);
    for intent in ["library_student", "enrollment_student", "library_student", "enrollment_student"] {
        stats.record(
            &TurnStats {
                intent: intent.to_string(),
                sentiment: Sentiment::Neutral,
                lead_score: 50,
            },
            Utc::now(),
        );
    }
    assert_eq!(stats.most_common_intent(), Some("enrollment_student"));
}

#[test]
fn test_returning_and_tail() {
    let mut stats = UserStats::new("u1", UserCategory::Employee);
    assert!(!stats.is_returning());
    assert_eq!(stats.average_lead_score(), None);
    for i in 0..4 {
        stats.record(&turn(i), Utc::now());
    }
    assert!(stats.is_returning());
    assert_eq!(
        stats.recent_sentiment_tail(3),
        vec![Sentiment::Negative, Sentiment::Positive, Sentiment::Negative]
    );
    assert_eq!(stats.average_lead_score(), Some(7.5));
}
