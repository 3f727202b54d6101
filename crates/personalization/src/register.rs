//! Cultural register: locale plus formality, used only to steer the reply's register.

use std::fmt;

use analyzer::Tokens;
use assist_core::Language;
use context_strategies::SimilarityMatch;
use serde::Serialize;

const FORMAL_MARKERS: &[&str] = &[
    "dear",
    "dear sir",
    "dear madam",
    "yours sincerely",
    "sincerely",
    "kind regards",
    "best regards",
    "kindly",
    "mr",
    "mrs",
    "ms",
    "prof",
    "sehr geehrte",
    "sehr geehrter",
    "mit freundlichen grüßen",
    "hochachtungsvoll",
    "herr",
    "frau",
];

const CASUAL_MARKERS: &[&str] = &[
    "hi", "hey", "hallo", "moin", "thanks", "danke", "cheers", "gonna", "wanna", "yo", "lol",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Formal,
    Casual,
    /// Casual in past similar messages, neutral now.
    Relaxed,
    /// Formal in past similar messages, neutral now.
    Professional,
    Balanced,
}

impl Formality {
    pub fn label(&self) -> &'static str {
        match self {
            Formality::Formal => "Formal",
            Formality::Casual => "Casual",
            Formality::Relaxed => "Relaxed",
            Formality::Professional => "Professional",
            Formality::Balanced => "Balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CulturalRegister {
    pub language: Language,
    pub formality: Formality,
}

impl CulturalRegister {
    /// Reply directive for this register.
    pub fn guidance(&self) -> &'static str {
        match (self.language, self.formality) {
            (Language::De, Formality::Formal) => {
                "Expects direct, structured answers with proper formality (Sie)."
            }
            (Language::De, _) => "Appreciates directness in a friendly manner.",
            (_, Formality::Formal) => "Professional, polite communication expected.",
            (_, Formality::Casual) => "Friendly, conversational style preferred.",
            (_, Formality::Relaxed) => "User typically communicates informally.",
            (_, Formality::Professional) => "User maintains a professional tone.",
            (_, Formality::Balanced) => "Adapt to the user's style.",
        }
    }
}

impl fmt::Display for CulturalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.language.display_name(), self.formality.label())
    }
}

fn is_formal(tokens: &Tokens) -> bool {
    tokens.any_match(FORMAL_MARKERS)
}

fn is_casual(tokens: &Tokens) -> bool {
    tokens.any_match(CASUAL_MARKERS)
}

fn has_contraction(tokens: &Tokens) -> bool {
    tokens.words().iter().any(|w| w.contains('\''))
}

/// German distinguishes formal and casual only. English falls back to the style of the
/// similar past messages when the current message carries no marker.
pub fn detect_register(
    message: &str,
    language: Language,
    matches: &[SimilarityMatch],
) -> CulturalRegister {
    let tokens = Tokens::new(message);
    let formality = match language {
        Language::De if is_formal(&tokens) => Formality::Formal,
        Language::De => Formality::Casual,
        Language::En if is_formal(&tokens) => Formality::Formal,
        Language::En if is_casual(&tokens) || has_contraction(&tokens) => Formality::Casual,
        Language::En => previous_style(matches),
    };
    CulturalRegister {
        language,
        formality,
    }
}

fn previous_style(matches: &[SimilarityMatch]) -> Formality {
    let (mut casual, mut formal) = (0, 0);
    for m in matches {
        let tokens = Tokens::new(&m.message.content);
        if is_casual(&tokens) || has_contraction(&tokens) {
            casual += 1;
        }
        if is_formal(&tokens) {
            formal += 1;
        }
    }
    match casual.cmp(&formal) {
        std::cmp::Ordering::Greater => Formality::Relaxed,
        std::cmp::Ordering::Less => Formality::Professional,
        std::cmp::Ordering::Equal => Formality::Balanced,
    }
}
