//! Detection of absolute or loaded phrasing in a message.

use serde::{Deserialize, Serialize};

use crate::tokens::Tokens;

const BIAS_WORDS: &[&str] = &[
    "only",
    "just",
    "always",
    "never",
    "must",
    "should",
    "all",
    "every",
    "none",
    "obviously",
    "clearly",
    "definitely",
];

/// Matches at which the bias score saturates.
const SATURATION: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasReport {
    pub level: BiasLevel,
    /// min(matches / 5, 1), rounded to two decimals.
    pub score: f32,
    /// Distinct matched words in order of first appearance.
    pub patterns: Vec<String>,
}

impl Default for BiasReport {
    fn default() -> Self {
        Self {
            level: BiasLevel::Low,
            score: 0.0,
            patterns: Vec::new(),
        }
    }
}

pub fn detect_bias(text: &str) -> BiasReport {
    let tokens = Tokens::new(text);
    let matches: Vec<&String> = tokens
        .words()
        .iter()
        .filter(|w| BIAS_WORDS.contains(&w.as_str()))
        .collect();

    let score = (matches.len() as f64 / SATURATION).min(1.0);
    let level = if score > 0.6 {
        BiasLevel::High
    } else if score > 0.3 {
        BiasLevel::Medium
    } else {
        BiasLevel::Low
    };

    let mut patterns: Vec<String> = Vec::new();
    for word in matches {
        if !patterns.contains(word) {
            patterns.push(word.clone());
        }
    }

    BiasReport {
        level,
        score: ((score * 100.0).round() / 100.0) as f32,
        patterns,
    }
}
