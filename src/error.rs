use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadlensError {
    DatabaseError(String),
    AnalysisError(String),
    ValidationError(String),
    ConfigurationError(String),
}

impl fmt::Display for LoadlensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadlensError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            LoadlensError::AnalysisError(msg) => write!(f, "Analysis error: {msg}"),
            LoadlensError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            LoadlensError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for LoadlensError {}

impl From<crate::database::FetchError> for LoadlensError {
    fn from(err: crate::database::FetchError) -> Self {
        LoadlensError::DatabaseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoadlensError>;
