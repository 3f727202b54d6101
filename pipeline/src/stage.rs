//! Stages of the turn pipeline, in execution order.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AnalyzeInput,
    ClassifyIntent,
    DetectTopic,
    GatherContext,
    GenerateResponse,
    AddInteractiveElements,
    FinalizeResponse,
    Done,
}

impl Stage {
    pub const FIRST: Stage = Stage::AnalyzeInput;

    /// The stage after this one; `Done` is terminal.
    pub fn next(self) -> Stage {
        match self {
            Stage::AnalyzeInput => Stage::ClassifyIntent,
            Stage::ClassifyIntent => Stage::DetectTopic,
            Stage::DetectTopic => Stage::GatherContext,
            Stage::GatherContext => Stage::GenerateResponse,
            Stage::GenerateResponse => Stage::AddInteractiveElements,
            Stage::AddInteractiveElements => Stage::FinalizeResponse,
            Stage::FinalizeResponse | Stage::Done => Stage::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::AnalyzeInput => "analyze_input",
            Stage::ClassifyIntent => "classify_intent",
            Stage::DetectTopic => "detect_topic",
            Stage::GatherContext => "gather_context",
            Stage::GenerateResponse => "generate_response",
            Stage::AddInteractiveElements => "add_interactive_elements",
            Stage::FinalizeResponse => "finalize_response",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_run_linearly_to_done() {
        let mut stage = Stage::FIRST;
        let mut visited = vec![stage];
        while stage != Stage::Done {
            stage = stage.next();
            visited.push(stage);
        }
        assert_eq!(visited.len(), 8);
        assert_eq!(Stage::Done.next(), Stage::Done);
    }
}
