//! Intent classification against the reference corpus.
//!
//! Each sample is scored as `0.7 * char-sequence ratio + 0.3 * keyword overlap`, where the
//! keyword overlap is the share of the label's topic words found in the message. The
//! first sample with the highest score wins, so equal scores resolve to corpus order.

use assist_core::{round_to, sequence_ratio, Language, UserCategory, GENERAL_QUERY};
use tracing::debug;

use crate::corpus::{label_keywords, IntentCorpus};
use crate::tokens::Tokens;

const TEXT_WEIGHT: f64 = 0.7;
const KEYWORD_WEIGHT: f64 = 0.3;

/// Default minimum combined score for accepting a corpus label.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.3;

/// Common prefix length at which a keyword counts as present (`enroll` ~ `enrollment`).
const STEM_PREFIX: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct IntentMatch {
    pub label: String,
    pub confidence: f32,
}

impl IntentMatch {
    fn general(confidence: f64) -> Self {
        Self {
            label: GENERAL_QUERY.to_string(),
            confidence: confidence as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntentClassifier {
    corpus: IntentCorpus,
    threshold: f64,
}

impl IntentClassifier {
    pub fn new(corpus: IntentCorpus) -> Self {
        Self {
            corpus,
            threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn corpus(&self) -> &IntentCorpus {
        &self.corpus
    }

    /// Classifies `text`. Below the acceptance threshold the label is `general_query`; when
    /// the corpus has no samples for the locale/audience the keyword fallback decides.
    pub fn classify(
        &self,
        text: &str,
        language: Language,
        category: Option<UserCategory>,
    ) -> IntentMatch {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return IntentMatch::general(0.0);
        }
        let tokens = Tokens::new(&query);

        let mut best: Option<(&str, f64)> = None;
        let mut seen_any = false;
        for sample in self.corpus.samples_for(language, category) {
            seen_any = true;
            let score = TEXT_WEIGHT * sequence_ratio(&query, &sample.text)
                + KEYWORD_WEIGHT * keyword_score(&tokens, &sample.label);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((sample.label.as_str(), score));
            }
        }

        if !seen_any {
            let label = fallback_intent(text, category.unwrap_or(UserCategory::Student));
            debug!(label = %label, "IntentClassifier: empty corpus slice, keyword fallback");
            return IntentMatch {
                label: label.to_string(),
                confidence: 0.5,
            };
        }

        match best {
            Some((label, score)) if score >= self.threshold => {
                debug!(label = %label, score, "IntentClassifier: matched");
                IntentMatch {
                    label: label.to_string(),
                    confidence: round_to(score, 2) as f32,
                }
            }
            Some((_, score)) => {
                debug!(score, "IntentClassifier: below threshold");
                IntentMatch::general(round_to(score, 2))
            }
            None => IntentMatch::general(0.0),
        }
    }
}

/// Share of the label's topic words present in the message.
fn keyword_score(tokens: &Tokens, label: &str) -> f64 {
    let keywords = label_keywords(label);
    if keywords.is_empty() {
        return 0.0;
    }
    let hits = keywords
        .iter()
        .filter(|k| tokens.words().iter().any(|w| same_stem(w, k)))
        .count();
    hits as f64 / keywords.len() as f64
}

fn same_stem(word: &str, keyword: &str) -> bool {
    if word == keyword {
        return true;
    }
    let common = word
        .chars()
        .zip(keyword.chars())
        .take_while(|(a, b)| a == b)
        .count();
    common >= STEM_PREFIX
}

/// Keyword rules used when no reference samples exist for the locale/audience.
pub fn fallback_intent(text: &str, category: UserCategory) -> &'static str {
    let tokens = Tokens::new(text);
    let rules: &[(&[&str], &'static str)] = match category.corpus_category() {
        UserCategory::Employee | UserCategory::Admin => &[
            (
                &["password", "login", "log in", "access", "email", "wifi", "network", "vpn", "slow", "not working"],
                "it_support_employee",
            ),
            (&["room", "book", "reserve", "meeting"], "room_booking_employee"),
            (&["hr", "leave", "payroll", "benefits", "vacation"], "hr_query_employee"),
        ],
        UserCategory::Student => &[
            (&["enrol*", "register*", "admission*", "apply"], "enrollment_student"),
            (&["course*", "class*", "schedule", "timetable", "program*"], "course_info_student"),
            (&["library", "book*", "research"], "library_student"),
            (&["exam*", "grade*", "result*", "test*"], "exam_info_student"),
        ],
        UserCategory::Partner => &[
            (&["partnership*", "collaborat*", "cooperat*"], "partnership_inquiry"),
            (&["facility", "facilities", "rent*", "venue", "space"], "facility_rental_partner"),
            (&["research", "project*", "funding"], "research_collaboration_partner"),
        ],
    };
    rules
        .iter()
        .find(|(terms, _)| tokens.any_match(terms))
        .map(|(_, label)| *label)
        .unwrap_or(GENERAL_QUERY)
}

/// Human-readable name of an intent label.
pub fn intent_description(label: &str) -> &str {
    match label {
        "it_support_employee" => "IT Support Request",
        "room_booking_employee" => "Room Booking",
        "hr_query_employee" => "HR Query",
        "network_issue_employee" => "Network Issue",
        "email_support_employee" => "Email Support",
        "enrollment_student" => "Enrollment/Registration",
        "course_info_student" => "Course Information",
        "library_student" => "Library Services",
        "exam_info_student" => "Exam/Grade Information",
        "admission_student" => "Admission Inquiry",
        "scholarship_student" => "Scholarship Information",
        "bachelor_programs_student" => "Bachelor Programs",
        "master_programs_student" => "Master Programs",
        "partnership_inquiry" => "Partnership Inquiry",
        "facility_rental_partner" => "Facility Rental",
        "research_collaboration_partner" => "Research Collaboration",
        "sponsorship_partner" => "Sponsorship Inquiry",
        "event_planning_partner" => "Event Planning",
        GENERAL_QUERY => "General Query",
        other => other,
    }
}

/// Label without its audience suffix: `it_support_employee` -> `it_support`.
pub fn intent_category(label: &str) -> &str {
    ["_employee", "_student", "_partner"]
        .iter()
        .find_map(|suffix| label.strip_suffix(suffix))
        .unwrap_or(label)
}

/// Intents that usually accompany a complaint or a problem report.
pub fn is_negative_intent(label: &str) -> bool {
    const NEGATIVE_KEYWORDS: &[&str] = &[
        "problem",
        "issue",
        "complaint",
        "error",
        "support",
        "trouble",
        "not_working",
        "outage",
        "broken",
        "emergency",
        "urgent",
    ];
    let label = label.to_lowercase();
    NEGATIVE_KEYWORDS.iter().any(|k| label.contains(k))
}
