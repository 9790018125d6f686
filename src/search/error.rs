use thiserror::Error;

/// Errors raised by the search stage.
///
/// Only [`SearchError::InvalidArgument`] and
/// [`SearchError::DependencyUnavailable`] escape [`SearchProvider::search`];
/// the remaining variants are transient and are absorbed into a partial
/// result.
///
/// [`SearchProvider::search`]: super::SearchProvider::search
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query has no searchable text.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No search backend is available.
    #[error("Search backend unavailable: {0}")]
    DependencyUnavailable(String),

    /// A request to the backend failed.
    #[error("Search request failed: {0}")]
    Http(String),

    /// A request to the backend timed out.
    #[error("Search request timed out: {0}")]
    Timeout(String),

    /// The backend response could not be parsed.
    #[error("Failed to parse search response: {0}")]
    Parse(String),
}

impl SearchError {
    /// Returns true for failures that are absorbed rather than propagated.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_) | Self::Parse(_))
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else {
            Self::Http(error.to_string())
        }
    }
}
