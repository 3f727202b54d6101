//! # Personalization
//!
//! Merges the outputs of the context strategies into one [`ContextBundle`] and derives the
//! narrative fields that steer the reply: [`Tone`], [`CulturalRegister`] and
//! [`SentimentTrend`]. Everything here is a pure function of already-fetched data.

mod bundle;
mod register;
mod tone;
mod trend;

pub use bundle::{fuse, ContextBundle};
pub use register::{detect_register, CulturalRegister, Formality};
pub use tone::{infer_tone, Tone};
pub use trend::{sentiment_trend, SentimentTrend};

use tracing::debug;

/// Narrative fields derived for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Personalization {
    pub tone: Tone,
    pub register: CulturalRegister,
    pub trend: SentimentTrend,
}

impl Personalization {
    /// Infers tone, register and trend for `message` from its fused context.
    pub fn infer(message: &str, bundle: &ContextBundle) -> Self {
        let classification = &bundle.classification;
        let personalization = Self {
            tone: infer_tone(message, classification.sentiment),
            register: detect_register(message, classification.language, &bundle.matches),
            trend: sentiment_trend(&bundle.matches, classification.sentiment, &bundle.history),
        };
        debug!(
            tone = %personalization.tone,
            register = %personalization.register,
            trend = personalization.trend.kind(),
            "Personalization: inferred"
        );
        personalization
    }
}
