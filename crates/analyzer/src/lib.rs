//! # Message Analyzer
//!
//! Classifies a single message: language, intent (with confidence), sentiment, lead score
//! and bias. Pure over its inputs and the reference corpus loaded at construction; never
//! fails on malformed text.
//!
//! ## Example
//!
//! ```rust
//! use analyzer::MessageAnalyzer;
//! use assist_core::{Language, UserCategory};
//!
//! let analyzer = MessageAnalyzer::builtin().expect("built-in corpus");
//! let analysis = analyzer.analyze_for("How do I enroll in courses?", None, UserCategory::Student);
//! assert_eq!(analysis.classification.language, Language::En);
//! ```

mod bias;
mod corpus;
mod intent;
mod language;
mod lead;
pub mod markers;
mod sentiment;
mod tokens;

pub use bias::{detect_bias, BiasLevel, BiasReport};
pub use corpus::{label_keywords, CorpusError, IntentCorpus, Sample};
pub use intent::{
    fallback_intent, intent_category, intent_description, is_negative_intent, IntentClassifier,
    IntentMatch, DEFAULT_ACCEPTANCE_THRESHOLD,
};
pub use language::{detect_language, DetectedLanguage};
pub use lead::{lead_score, LeadInputs};
pub use sentiment::{score_sentiment, SentimentScore};
pub use tokens::Tokens;

use assist_core::{Classification, Language, UserCategory};
use tracing::debug;

/// Full result of analyzing one message.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub classification: Classification,
    pub bias: BiasReport,
    /// False when language detection fell back to the hint or the default locale.
    pub language_confident: bool,
}

#[derive(Debug, Clone)]
pub struct MessageAnalyzer {
    classifier: IntentClassifier,
}

impl MessageAnalyzer {
    pub fn new(corpus: IntentCorpus) -> Self {
        Self {
            classifier: IntentClassifier::new(corpus),
        }
    }

    /// Analyzer over the corpus bundled with the crate.
    pub fn builtin() -> Result<Self, CorpusError> {
        Ok(Self::new(IntentCorpus::builtin()?))
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.classifier = self.classifier.with_threshold(threshold);
        self
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Analyzes `text` against the whole corpus of its locale.
    pub fn analyze(&self, text: &str, language_hint: Option<Language>) -> Analysis {
        self.run(text, language_hint, None)
    }

    /// Analyzes `text` for a user of `category`: only that audience's reference samples are
    /// considered and the lead score includes the audience weight.
    pub fn analyze_for(
        &self,
        text: &str,
        language_hint: Option<Language>,
        category: UserCategory,
    ) -> Analysis {
        self.run(text, language_hint, Some(category))
    }

    fn run(
        &self,
        text: &str,
        language_hint: Option<Language>,
        category: Option<UserCategory>,
    ) -> Analysis {
        if text.trim().is_empty() {
            return Analysis {
                classification: Classification::neutral(language_hint.unwrap_or_default()),
                bias: BiasReport::default(),
                language_confident: false,
            };
        }

        let detected = detect_language(text, language_hint);
        let intent = self.classifier.classify(text, detected.language, category);
        let sentiment = score_sentiment(text, detected.language, &intent.label);
        let lead = lead_score(&LeadInputs {
            text,
            language: detected.language,
            sentiment: sentiment.label,
            intent: &intent.label,
            category,
        });

        debug!(
            language = %detected.language,
            intent = %intent.label,
            confidence = intent.confidence,
            sentiment = %sentiment.label,
            lead_score = lead,
            "MessageAnalyzer: analyzed message"
        );

        Analysis {
            classification: Classification {
                language: detected.language,
                intent: intent.label,
                confidence: intent.confidence,
                sentiment: sentiment.label,
                lead_score: lead,
            },
            bias: detect_bias(text),
            language_confident: detected.confident,
        }
    }
}
