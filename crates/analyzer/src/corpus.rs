//! Labeled reference corpus for intent classification.
//!
//! Loaded from tab-separated text with the header `language  category  text  label`.
//! A built-in corpus ships with the crate; deployments can replace it with their own file.

use std::collections::BTreeSet;
use std::path::Path;

use assist_core::{Language, UserCategory};
use thiserror::Error;
use tracing::info;

const BUILTIN_CORPUS: &str = include_str!("../data/intents.tsv");

/// Words that mark the audience of a label rather than its topic.
const CATEGORY_SUFFIXES: &[&str] = &["employee", "student", "partner", "inquiry"];

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// One labeled reference utterance, stored lower-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub language: Language,
    pub category: UserCategory,
    pub text: String,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct IntentCorpus {
    samples: Vec<Sample>,
}

impl IntentCorpus {
    pub fn builtin() -> Result<Self, CorpusError> {
        Self::from_tsv(BUILTIN_CORPUS)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let corpus = Self::from_tsv(&content)?;
        info!(
            path = %path.as_ref().display(),
            samples = corpus.len(),
            "Loaded intent corpus"
        );
        Ok(corpus)
    }

    /// Parses TSV content. Blank lines and lines starting with `#` are skipped; the first
    /// non-comment line must be the header.
    pub fn from_tsv(content: &str) -> Result<Self, CorpusError> {
        let mut samples = Vec::new();
        let mut header_seen = false;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if !header_seen {
                if fields != ["language", "category", "text", "label"] {
                    return Err(CorpusError::Parse {
                        line: line_no,
                        reason: "expected header: language, category, text, label".to_string(),
                    });
                }
                header_seen = true;
                continue;
            }
            let [language, category, text, label] = fields[..] else {
                return Err(CorpusError::Parse {
                    line: line_no,
                    reason: format!("expected 4 fields, found {}", fields.len()),
                });
            };
            let parse_err = |e: assist_core::ParseLabelError| CorpusError::Parse {
                line: line_no,
                reason: e.to_string(),
            };
            if text.is_empty() || label.is_empty() {
                return Err(CorpusError::Parse {
                    line: line_no,
                    reason: "text and label must not be empty".to_string(),
                });
            }
            samples.push(Sample {
                language: language.parse().map_err(parse_err)?,
                category: category.parse().map_err(parse_err)?,
                text: text.to_lowercase(),
                label: label.to_string(),
            });
        }

        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples for a locale, optionally restricted to one audience, in file order.
    pub fn samples_for(
        &self,
        language: Language,
        category: Option<UserCategory>,
    ) -> impl Iterator<Item = &Sample> {
        let category = category.map(|c| c.corpus_category());
        self.samples
            .iter()
            .filter(move |s| s.language == language && category.map_or(true, |c| s.category == c))
    }

    /// Distinct labels in the corpus.
    pub fn labels(&self) -> BTreeSet<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }
}

/// Topic words of a label: `room_booking_employee` -> `["room", "booking"]`.
pub fn label_keywords(label: &str) -> Vec<&str> {
    label
        .split('_')
        .filter(|w| !w.is_empty() && !CATEGORY_SUFFIXES.contains(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_corpus_loads() {
        let corpus = IntentCorpus::builtin().unwrap();
        assert!(corpus.len() > 40);
        assert!(corpus.labels().contains("enrollment_student"));
        assert!(corpus
            .samples_for(Language::De, Some(UserCategory::Student))
            .all(|s| s.language == Language::De && s.category == UserCategory::Student));
    }

    #[test]
    fn test_admin_reads_employee_samples() {
        let corpus = IntentCorpus::builtin().unwrap();
        let admin = corpus.samples_for(Language::En, Some(UserCategory::Admin)).count();
        let employee = corpus
            .samples_for(Language::En, Some(UserCategory::Employee))
            .count();
        assert_eq!(admin, employee);
        assert!(admin > 0);
    }

    #[test]
    fn test_bad_rows_are_reported_with_line() {
        let err = IntentCorpus::from_tsv("language\tcategory\ttext\tlabel\nen\tstudent\tonly three")
            .unwrap_err();
        assert!(matches!(err, CorpusError::Parse { line: 2, .. }));

        let err = IntentCorpus::from_tsv("language\tcategory\ttext\tlabel\nfr\tstudent\tbonjour\tx")
            .unwrap_err();
        assert!(err.to_string().contains("language"));

        assert!(IntentCorpus::from_tsv("text\tlabel\n").is_err());
    }

    #[test]
    fn test_label_keywords() {
        assert_eq!(label_keywords("room_booking_employee"), vec!["room", "booking"]);
        assert_eq!(label_keywords("partnership_inquiry"), vec!["partnership"]);
        assert_eq!(label_keywords("general_query"), vec!["general", "query"]);
    }
}
