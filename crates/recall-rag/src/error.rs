use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Vector service or embedding endpoint unreachable
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RagError>;
