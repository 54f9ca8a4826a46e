use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid template parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to load templates from {path}: {reason}")]
    Load { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, PromptError>;
