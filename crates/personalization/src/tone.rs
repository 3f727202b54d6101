//! Tone of the current message.
//!
//! Markers win over sentiment: a negative message phrased as a question without any
//! frustration marker reads as curious.

use std::fmt;

use analyzer::markers::{has_frustration, has_gratitude, has_urgency, is_question};
use assist_core::Sentiment;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Urgent,
    Grateful,
    Curious,
    Frustrated,
    Satisfied,
    Neutral,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Urgent => "Urgent",
            Tone::Grateful => "Grateful",
            Tone::Curious => "Curious",
            Tone::Frustrated => "Frustrated",
            Tone::Satisfied => "Satisfied",
            Tone::Neutral => "Neutral",
        }
    }

    /// Reply directive for this tone.
    pub fn guidance(&self) -> &'static str {
        match self {
            Tone::Urgent => "Answer immediately with the concrete next step first.",
            Tone::Grateful => "Acknowledge the thanks briefly and keep the warm tone.",
            Tone::Curious => "Explain clearly and invite follow-up questions.",
            Tone::Frustrated => "Be patient, validate the frustration and give step-by-step help.",
            Tone::Satisfied => "Share the positive mood and reinforce what worked.",
            Tone::Neutral => "Be informative and engaging.",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn infer_tone(message: &str, sentiment: Sentiment) -> Tone {
    if has_urgency(message) {
        return Tone::Urgent;
    }
    if has_gratitude(message) {
        return Tone::Grateful;
    }
    if is_question(message) && !has_frustration(message) {
        return Tone::Curious;
    }
    match sentiment {
        Sentiment::Negative => Tone::Frustrated,
        Sentiment::Positive => Tone::Satisfied,
        Sentiment::Neutral => Tone::Neutral,
    }
}
