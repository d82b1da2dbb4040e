use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MockError {
    #[error("Missing required configuration: {0}")]
    ConfigMissing(String),

    #[error("Cannot read configuration {}: {reason}", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid mock key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MockError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MockError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, MockError>;
