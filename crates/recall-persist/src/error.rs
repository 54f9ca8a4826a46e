use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Invalid thread id: {0:?}")]
    InvalidThreadId(String),

    #[error("Retained messages are not in creation order for thread {0}")]
    UnorderedMessages(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;
