use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("ticket not found: {0}")]
    NotFound(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("source control error: {0}")]
    SourceControl(String),
    #[error("analysis timed out after {0} seconds")]
    Timeout(u64),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    /// Configuration failures need setup instructions rather than a retry.
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::Configuration(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
