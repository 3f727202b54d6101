//! Marker vocabularies shared by sentiment, lead scoring and tone inference.

use assist_core::Language;

use crate::tokens::Tokens;

pub const URGENCY_TERMS: &[&str] = &[
    "urgent",
    "urgently",
    "asap",
    "immediately",
    "emergency",
    "right now",
    "please help",
    "dringend",
    "sofort",
    "notfall",
];

pub const GRATITUDE_TERMS: &[&str] = &[
    "thanks",
    "thank*",
    "appreciate*",
    "grateful",
    "great",
    "awesome",
    "danke",
    "dankeschön",
    "vielen dank",
];

/// Expressions of annoyance that rule out a merely curious tone.
pub const FRUSTRATION_TERMS: &[&str] = &[
    "frustrat*",
    "annoy*",
    "angry",
    "ridiculous",
    "again",
    "still",
    "useless",
    "terrible",
    "verärgert",
    "frustriert",
    "schon wieder",
    "immer noch",
];

pub const GREETING_TERMS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "hallo",
    "guten tag",
    "good morning",
    "moin",
];

pub const QUESTION_WORDS: &[&str] = &[
    "how", "what", "where", "when", "why", "which", "who", "wie", "was", "wo", "wann", "warum",
    "welche", "wer",
];

pub fn has_urgency(text: &str) -> bool {
    text.contains("!!!") || Tokens::new(text).any_match(URGENCY_TERMS)
}

pub fn has_gratitude(text: &str) -> bool {
    Tokens::new(text).any_match(GRATITUDE_TERMS)
}

pub fn has_frustration(text: &str) -> bool {
    Tokens::new(text).any_match(FRUSTRATION_TERMS)
}

pub fn has_greeting(text: &str) -> bool {
    Tokens::new(text).any_match(GREETING_TERMS)
}

pub fn is_question(text: &str) -> bool {
    text.contains('?')
        || Tokens::new(text)
            .words()
            .first()
            .is_some_and(|w| QUESTION_WORDS.contains(&w.as_str()))
}

/// Positive sentiment vocabulary per locale.
pub(crate) fn positive_terms(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &[
            "great",
            "excellent",
            "good",
            "happy",
            "love",
            "wonderful",
            "amazing",
            "helpful",
            "thank*",
            "thanks",
            "perfect",
            "awesome",
            "fantastic",
            "appreciate*",
            "satisfied",
            "pleased",
            "nice",
            "works now",
            "solved",
            "resolved",
        ],
        Language::De => &[
            "großartig",
            "ausgezeichnet",
            "gut",
            "glücklich",
            "wunderbar",
            "hilfreich",
            "danke",
            "perfekt",
            "fantastisch",
            "zufrieden",
            "super",
            "klappt",
        ],
    }
}

/// Negative sentiment vocabulary per locale.
pub(crate) fn negative_terms(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &[
            "bad",
            "terrible",
            "poor",
            "hate",
            "awful",
            "horrible",
            "worst",
            "disappoint*",
            "frustrat*",
            "annoyed",
            "angry",
            "useless",
            "confused",
            "difficult",
            "struggling",
            "trouble",
        ],
        Language::De => &[
            "schlecht",
            "schrecklich",
            "hasse",
            "furchtbar",
            "enttäuscht",
            "frustriert",
            "verärgert",
            "wütend",
            "nutzlos",
            "ärgerlich",
        ],
    }
}

/// Unambiguous problem reports.
pub(crate) const STRONG_PROBLEM_TERMS: &[&str] = &[
    "can't",
    "cant",
    "cannot",
    "won't",
    "isn't",
    "doesn't",
    "not working",
    "doesn't work",
    "broken",
    "error*",
    "outage",
    "failing",
    "failed",
    "fails",
    "funktioniert nicht",
    "kaputt",
    "fehler*",
    "geht nicht",
];

/// Words that signal a problem only in a support context.
pub(crate) const CONTEXTUAL_PROBLEM_TERMS: &[&str] =
    &["help", "slow", "issue*", "problem*", "hilfe", "langsam"];

/// Strong purchase/commitment signals for lead scoring.
pub(crate) fn high_intent_terms(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &[
            "enrol*",
            "apply",
            "application*",
            "register*",
            "admission*",
            "fee*",
            "deadline*",
            "requirement*",
            "eligib*",
            "program*",
            "course*",
            "join",
            "partnership*",
        ],
        Language::De => &[
            "einschreib*",
            "bewerb*",
            "anmeld*",
            "zulassung*",
            "gebühr*",
            "frist*",
            "voraussetzung*",
            "studiengang*",
            "kurs*",
            "partnerschaft*",
        ],
    }
}

/// Information-seeking signals for lead scoring.
pub(crate) fn medium_intent_terms(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &[
            "information",
            "details",
            "about",
            "tell",
            "explain",
            "know",
            "understand",
            "learn",
        ],
        Language::De => &[
            "information*",
            "details",
            "über",
            "erzählen",
            "erklären",
            "wissen",
            "verstehen",
            "lernen",
        ],
    }
}
