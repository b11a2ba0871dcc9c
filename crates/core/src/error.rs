use thiserror::Error;

/// Errors produced by the core domain model.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl From<Vec<String>> for CoreError {
    fn from(issues: Vec<String>) -> Self {
        Self::Validation(issues)
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
