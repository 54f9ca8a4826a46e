use recall_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    /// Summary model call failed; the thread was left untouched
    #[error("Summarization failed: {0}")]
    SummarizationFailure(String),

    #[error("Invalid memory policy: {0}")]
    InvalidPolicy(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
