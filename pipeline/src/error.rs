use assist_core::StoreError;
use thiserror::Error;

/// Failures that abort a turn. Retrieval and completion problems never surface here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session {0} is not accessible to this user")]
    AccessDenied(String),

    #[error("Message is empty")]
    EmptyMessage,
}

impl PipelineError {
    /// Text safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::EmptyMessage => "Please type a message.".to_string(),
            PipelineError::SessionNotFound(_) | PipelineError::AccessDenied(_) => {
                "This conversation is not available. Please start a new one.".to_string()
            }
            PipelineError::Store(_) => crate::templates::error_response(),
        }
    }

    /// True when the store reported the failure.
    pub fn is_store(&self) -> bool {
        matches!(self, PipelineError::Store(_))
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
