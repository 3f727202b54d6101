//! Knowledge documents and search results.

use assist_core::{Language, UserCategory};
use serde::{Deserialize, Serialize};

/// One passage of the knowledge corpus as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    /// Audience the passage is written for; `None` applies to everyone.
    #[serde(default)]
    pub category: Option<UserCategory>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgePassage {
    pub passage_id: String,
    pub text: String,
    /// Cosine similarity clamped to [0, 1].
    pub score: f32,
    pub source: Option<String>,
    pub language: Option<Language>,
}

/// Metadata restrictions of a search. Documents without the field always pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnowledgeFilter {
    pub language: Option<Language>,
    pub category: Option<UserCategory>,
}

impl KnowledgeFilter {
    pub fn language(language: Language) -> Self {
        Self {
            language: Some(language),
            category: None,
        }
    }

    pub fn with_category(mut self, category: UserCategory) -> Self {
        self.category = Some(category.corpus_category());
        self
    }

    pub(crate) fn accepts(&self, doc: &KnowledgeDocument) -> bool {
        let language_ok = match (self.language, doc.language) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        };
        let category_ok = match (self.category, doc.category) {
            (Some(wanted), Some(actual)) => wanted == actual.corpus_category(),
            _ => true,
        };
        language_ok && category_ok
    }
}
