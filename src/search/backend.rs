//! Boundary between the search provider and a concrete search backend.

use std::collections::BTreeMap;
use std::fmt;

use super::SearchError;

/// Content filtering level requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SafeSearch {
    Off,
    #[default]
    Moderate,
    Strict,
}

impl fmt::Display for SafeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Moderate => write!(f, "moderate"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Recency window requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeLimit {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimeLimit {
    /// Single-letter code used by search backends.
    pub fn code(self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
            Self::Year => "y",
        }
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// One item as emitted by a backend, before normalization.
///
/// Backends disagree on key names (`href` vs `url` vs `link`, `body` vs
/// `desc`), so items are kept as a string map until
/// [`normalize`](super::normalize) maps them onto [`SearchResult`].
///
/// [`SearchResult`]: crate::models::SearchResult
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResult {
    fields: BTreeMap<String, String>,
}

impl RawResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawResult {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Lazy stream of raw items. Advancing it may perform network I/O.
pub type RawResults<'a> = Box<dyn Iterator<Item = Result<RawResult, SearchError>> + 'a>;

/// A web search backend.
///
/// This trait enables mocking in unit tests and keeps the provider independent
/// of any particular search engine.
pub trait SearchBackend: Send + Sync {
    /// Starts a text search.
    ///
    /// Implementations should defer fetching until the returned iterator is
    /// advanced, so callers that stop early do not over-fetch.
    fn text<'a>(
        &'a self,
        query: &str,
        safesearch: SafeSearch,
        timelimit: TimeLimit,
    ) -> Result<RawResults<'a>, SearchError>;
}
