/// Error types for the newsagg library
use std::fmt;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, NewsError>;

/// Main error type for pipeline operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsError {
    /// I/O errors
    Io(String),

    /// Malformed listing file (article or auxiliary input listing)
    Listing(String),

    /// Article record parsing errors
    Parse(String),

    /// Worker pool construction or configuration errors
    Pool(String),

    /// Output artifact errors
    Output(String),

    /// General errors
    Other(String),
}

impl fmt::Display for NewsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsError::Io(msg) => write!(f, "I/O error: {}", msg),
            NewsError::Listing(msg) => write!(f, "Listing error: {}", msg),
            NewsError::Parse(msg) => write!(f, "Parse error: {}", msg),
            NewsError::Pool(msg) => write!(f, "Worker pool error: {}", msg),
            NewsError::Output(msg) => write!(f, "Output error: {}", msg),
            NewsError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for NewsError {}

impl From<std::io::Error> for NewsError {
    fn from(err: std::io::Error) -> Self {
        NewsError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NewsError {
    fn from(err: serde_json::Error) -> Self {
        NewsError::Parse(err.to_string())
    }
}

impl From<String> for NewsError {
    fn from(msg: String) -> Self {
        NewsError::Other(msg)
    }
}

impl From<&str> for NewsError {
    fn from(msg: &str) -> Self {
        NewsError::Other(msg.to_string())
    }
}
