//! Lead score: a 0-100 estimate of engagement and urgency.

use assist_core::{Language, Sentiment, UserCategory};

use crate::intent::intent_category;
use crate::markers::{high_intent_terms, medium_intent_terms, GRATITUDE_TERMS, URGENCY_TERMS};
use crate::tokens::Tokens;

const BASE_SCORE: i32 = 50;
const HIGH_VALUE_INTENTS: &[&str] = &["enrollment", "admission", "partnership", "collaboration"];

/// Inputs of the lead score. All fields come from the same message's analysis.
#[derive(Debug, Clone, Copy)]
pub struct LeadInputs<'a> {
    pub text: &'a str,
    pub language: Language,
    pub sentiment: Sentiment,
    pub intent: &'a str,
    pub category: Option<UserCategory>,
}

/// Deterministic weighted sum clamped to [0, 100].
pub fn lead_score(inputs: &LeadInputs<'_>) -> u8 {
    let tokens = Tokens::new(inputs.text);
    let mut score = BASE_SCORE;

    score += match inputs.category {
        Some(UserCategory::Student) => 10,
        Some(UserCategory::Employee) | Some(UserCategory::Admin) => 5,
        Some(UserCategory::Partner) => 15,
        None => 0,
    };

    score += match inputs.sentiment {
        Sentiment::Positive => 15,
        Sentiment::Neutral => 0,
        Sentiment::Negative => -10,
    };

    let category = intent_category(inputs.intent);
    if HIGH_VALUE_INTENTS.iter().any(|hv| category.contains(hv)) {
        score += 20;
    }

    score += 10 * tokens.count_matches(high_intent_terms(inputs.language)) as i32;
    score += 5 * tokens.count_matches(medium_intent_terms(inputs.language)) as i32;

    if inputs.text.contains("!!!") || tokens.any_match(URGENCY_TERMS) {
        score += 10;
    }
    if tokens.any_match(GRATITUDE_TERMS) {
        score += 5;
    }

    let questions = inputs.text.matches('?').count() as i32;
    score += (questions * 3).min(10);

    let words = tokens.word_count();
    if words > 20 {
        score += 10;
    } else if words > 10 {
        score += 5;
    }

    score.clamp(0, 100) as u8
}
