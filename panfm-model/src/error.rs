use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
