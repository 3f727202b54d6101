use thiserror::Error;

/// Errors raised by [`crate::MessageStore`] and [`crate::UserStatsStore`] implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// A stored or configured label (role, category, sentiment, language) that is not recognized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} label: {value}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseLabelError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl From<ParseLabelError> for StoreError {
    fn from(e: ParseLabelError) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
