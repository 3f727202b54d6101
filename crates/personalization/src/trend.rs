//! Sentiment trend across the most similar past interactions.
//!
//! A trend is only claimed when at least two similarity matches share the plurality prior
//! sentiment; a single match never drives a narrative.

use assist_core::Sentiment;
use context_strategies::{SessionHistory, SimilarityMatch};
use serde::Serialize;

const MIN_CONSISTENT_MATCHES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SentimentTrend {
    /// Negative before, better now.
    Improvement { prior_negative: usize },
    RecurringFrustration { prior_negative: usize },
    /// Usually satisfied, upset now.
    UnexpectedIssue { prior_positive: usize },
    ConsistentSatisfaction { prior_positive: usize },
    NoTrend,
}

impl SentimentTrend {
    pub fn kind(&self) -> &'static str {
        match self {
            SentimentTrend::Improvement { .. } => "improvement",
            SentimentTrend::RecurringFrustration { .. } => "recurring_frustration",
            SentimentTrend::UnexpectedIssue { .. } => "unexpected_issue",
            SentimentTrend::ConsistentSatisfaction { .. } => "consistent_satisfaction",
            SentimentTrend::NoTrend => "no_trend",
        }
    }

    pub fn narrative(&self) -> String {
        match self {
            SentimentTrend::Improvement { prior_negative: 0 } => {
                "IMPROVEMENT: earlier sessions were mostly negative but recent interactions are positive. Acknowledge the positive change.".to_string()
            }
            SentimentTrend::Improvement { prior_negative } => format!(
                "IMPROVEMENT: the user was frustrated before ({}x negative) but now seems better. Acknowledge the positive change.",
                prior_negative
            ),
            SentimentTrend::RecurringFrustration { prior_negative } => format!(
                "RECURRING FRUSTRATION: the user has been negative {} times in similar conversations. Be extra empathetic, patient and solution-focused.",
                prior_negative
            ),
            SentimentTrend::UnexpectedIssue { prior_positive } => format!(
                "UNEXPECTED ISSUE: the user was usually satisfied ({}x positive) but is upset now. Investigate carefully.",
                prior_positive
            ),
            SentimentTrend::ConsistentSatisfaction { prior_positive } => format!(
                "CONSISTENT SATISFACTION: the user is generally happy ({}x positive). Maintain the positive relationship.",
                prior_positive
            ),
            SentimentTrend::NoTrend => "No consistent sentiment history. Be warm and helpful.".to_string(),
        }
    }
}

/// Compares `current` with the plurality sentiment of the similar past messages.
///
/// The older part of `history` (every summary but the most recent) only matters when the
/// matches are consistently positive: a predominantly negative past then reads as an
/// improvement.
pub fn sentiment_trend(
    matches: &[SimilarityMatch],
    current: Sentiment,
    history: &SessionHistory,
) -> SentimentTrend {
    let (mut positive, mut neutral, mut negative) = (0usize, 0usize, 0usize);
    for sentiment in matches.iter().filter_map(SimilarityMatch::sentiment) {
        match sentiment {
            Sentiment::Positive => positive += 1,
            Sentiment::Neutral => neutral += 1,
            Sentiment::Negative => negative += 1,
        }
    }

    let plurality = positive.max(neutral).max(negative);
    let leaders = [positive, neutral, negative]
        .iter()
        .filter(|&&count| count == plurality)
        .count();
    if plurality < MIN_CONSISTENT_MATCHES || leaders > 1 {
        return SentimentTrend::NoTrend;
    }

    if negative == plurality {
        return match current {
            Sentiment::Positive => SentimentTrend::Improvement {
                prior_negative: negative,
            },
            _ => SentimentTrend::RecurringFrustration {
                prior_negative: negative,
            },
        };
    }

    if positive == plurality {
        if current == Sentiment::Negative {
            return SentimentTrend::UnexpectedIssue {
                prior_positive: positive,
            };
        }
        if older_history_negative(history) {
            return SentimentTrend::Improvement { prior_negative: 0 };
        }
        return SentimentTrend::ConsistentSatisfaction {
            prior_positive: positive,
        };
    }

    SentimentTrend::NoTrend
}

/// More than half of the older analyzed sessions were dominantly negative.
fn older_history_negative(history: &SessionHistory) -> bool {
    let older: Vec<Sentiment> = history
        .summaries
        .iter()
        .skip(1)
        .filter(|s| s.analyzed_count > 0)
        .map(|s| s.dominant_sentiment)
        .collect();
    if older.len() < MIN_CONSISTENT_MATCHES {
        return false;
    }
    let negative = older.iter().filter(|s| **s == Sentiment::Negative).count();
    negative * 2 > older.len()
}
