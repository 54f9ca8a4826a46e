use recall_persist::PersistError;
use recall_prompt::PromptError;
use thiserror::Error;

/// Turn-level failures; everything else degrades inside the turn
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurnError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Misconfigured template; raised before any model call
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Model call failed or was interrupted; no assistant message was recorded
    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    #[error("Thread store error: {0}")]
    Persist(#[from] PersistError),
}

impl From<PromptError> for TurnError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::TemplateNotFound(name) => Self::TemplateNotFound(name),
            other => Self::InvalidParameter(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TurnError>;
