//! Locale detection by marker-word counting.

use assist_core::Language;

use crate::tokens::Tokens;

const GERMAN_MARKERS: &[&str] = &[
    "ich", "der", "die", "das", "und", "ist", "ein", "eine", "wie", "was", "wo", "wann", "können",
    "kann", "möchte", "bitte", "nicht", "mit", "für", "mein", "meine", "sie", "wir", "habe",
    "gibt", "es", "auf", "zu", "den", "dem",
];

const ENGLISH_MARKERS: &[&str] = &[
    "the", "is", "and", "or", "what", "how", "when", "where", "can", "would", "i", "am", "you",
    "do", "for", "to", "my", "are", "in", "of", "a", "please", "it", "me",
];

/// Minimum number of words before the marker counts are trusted.
const MIN_WORDS: usize = 2;

/// Result of language detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedLanguage {
    pub language: Language,
    /// False when the fallback was used (input too short or counts tied).
    pub confident: bool,
}

/// Detects the message locale. Short or ambiguous input resolves to `hint`, else English.
pub fn detect_language(text: &str, hint: Option<Language>) -> DetectedLanguage {
    let fallback = DetectedLanguage {
        language: hint.unwrap_or_default(),
        confident: false,
    };

    let tokens = Tokens::new(text);
    if tokens.word_count() < MIN_WORDS {
        return fallback;
    }

    let umlauts = text
        .chars()
        .filter(|c| matches!(c, 'ä' | 'ö' | 'ü' | 'ß' | 'Ä' | 'Ö' | 'Ü'))
        .count();
    let german = tokens.count_occurrences(GERMAN_MARKERS) + umlauts;
    let english = tokens.count_occurrences(ENGLISH_MARKERS);

    match german.cmp(&english) {
        std::cmp::Ordering::Greater => DetectedLanguage {
            language: Language::De,
            confident: true,
        },
        std::cmp::Ordering::Less => DetectedLanguage {
            language: Language::En,
            confident: true,
        },
        std::cmp::Ordering::Equal => fallback,
    }
}
