use std::fmt;

use serde::{Deserialize, Serialize};

use super::SearchResult;

/// How the text of an [`AnswerResult`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// The completion endpoint generated the answer.
    Model,
    /// The completion call failed; the answer embeds the error and raw context.
    ModelError,
    /// No credential was configured; the answer is the raw context.
    NoCredential,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::ModelError => write!(f, "model_error"),
            Self::NoCredential => write!(f, "no_credential"),
        }
    }
}

/// Answer to a query together with the sources it was built from.
///
/// `answer` may contain bracketed citations such as `[1]` that refer to the
/// 1-based position in `sources`. Citation indices are not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    query: String,
    answer: String,
    sources: Vec<SearchResult>,
    produced_by: AnswerSource,
}

impl AnswerResult {
    /// Creates a new answer result.
    pub fn new(
        query: impl Into<String>,
        answer: impl Into<String>,
        sources: Vec<SearchResult>,
        produced_by: AnswerSource,
    ) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
            sources,
            produced_by,
        }
    }

    /// Returns the original query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the answer text.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns the sources in search order.
    pub fn sources(&self) -> &[SearchResult] {
        &self.sources
    }

    /// Returns how the answer text was produced.
    pub fn produced_by(&self) -> AnswerSource {
        self.produced_by
    }

    /// Returns true if the answer came from the model rather than a fallback.
    pub fn is_generated(&self) -> bool {
        self.produced_by == AnswerSource::Model
    }
}
