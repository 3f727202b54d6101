//! Rule-based sentiment scoring with intent-aware weighting.
//!
//! Contextual problem words ("help", "slow", "issue") count double and force a negative
//! reading only under a support-type intent; elsewhere they are a mild negative signal.

use assist_core::{Language, Sentiment};

use crate::intent::is_negative_intent;
use crate::markers::{
    negative_terms, positive_terms, CONTEXTUAL_PROBLEM_TERMS, STRONG_PROBLEM_TERMS,
};
use crate::tokens::Tokens;

const POLARITY_MARGIN: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub label: Sentiment,
    /// (positive - negative) / total, in [-1, 1]; 0 when no signal was found.
    pub polarity: f64,
    pub has_problem: bool,
}

pub fn score_sentiment(text: &str, language: Language, intent: &str) -> SentimentScore {
    let tokens = Tokens::new(text);
    let negative_intent = is_negative_intent(intent);

    let positive = tokens.count_matches(positive_terms(language));
    let mut negative = tokens.count_matches(negative_terms(language));

    let strong_problem = tokens.any_match(STRONG_PROBLEM_TERMS);
    let contextual_problem = tokens.any_match(CONTEXTUAL_PROBLEM_TERMS);
    if strong_problem {
        negative += 2;
    }
    if contextual_problem {
        negative += if negative_intent { 2 } else { 1 };
    }
    if negative_intent && negative > 0 {
        negative += 1;
    }
    let has_problem = strong_problem || (contextual_problem && negative_intent);

    let total = positive + negative;
    if total == 0 {
        return SentimentScore {
            label: Sentiment::Neutral,
            polarity: 0.0,
            has_problem,
        };
    }

    let polarity = (positive as f64 - negative as f64) / total as f64;
    let label = if polarity > POLARITY_MARGIN {
        Sentiment::Positive
    } else if polarity < -POLARITY_MARGIN || has_problem {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    SentimentScore {
        label,
        polarity,
        has_problem,
    }
}
