use std::fmt;

use serde::{Deserialize, Serialize};

/// Weight of the accuracy score in the overall score.
pub const ACCURACY_WEIGHT: f64 = 0.3;
/// Weight of the relevance score in the overall score.
pub const RELEVANCE_WEIGHT: f64 = 0.3;
/// Weight of the search quality score in the overall score.
pub const SEARCH_QUALITY_WEIGHT: f64 = 0.3;
/// Weight of the citation quality score in the overall score.
pub const CITATION_WEIGHT: f64 = 0.1;

/// Score used for any criterion the evaluator could not obtain.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Which evaluation path produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMethod {
    /// Scores were returned by the completion endpoint.
    Model,
    /// The model path failed and neutral scores were substituted.
    Neutral,
    /// No credential was configured; scores come from textual heuristics.
    Heuristic,
}

impl fmt::Display for EvaluationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Neutral => write!(f, "neutral"),
            Self::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Quality report for a generated answer.
///
/// Scores are nominally 0-10 but model-reported values, fractional ones
/// included, are passed through unclamped and unrounded. `search_quality` is `None` on the heuristic path, which never
/// scores that criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy_score: f64,
    pub relevance_score: f64,
    pub search_quality: Option<f64>,
    pub citation_quality: f64,
    pub overall_score: f64,
    pub feedback: String,
    pub strengths: String,
    pub opportunity: String,
    pub method: EvaluationMethod,
}

impl EvaluationReport {
    /// Builds a model-path report, computing the weighted overall score.
    pub fn weighted(
        accuracy_score: f64,
        relevance_score: f64,
        search_quality: f64,
        citation_quality: f64,
        feedback: String,
        strengths: String,
        opportunity: String,
    ) -> Self {
        let overall = accuracy_score * ACCURACY_WEIGHT
            + relevance_score * RELEVANCE_WEIGHT
            + search_quality * SEARCH_QUALITY_WEIGHT
            + citation_quality * CITATION_WEIGHT;

        Self {
            accuracy_score,
            relevance_score,
            search_quality: Some(search_quality),
            citation_quality,
            overall_score: round_one_decimal(overall),
            feedback,
            strengths,
            opportunity,
            method: EvaluationMethod::Model,
        }
    }

    /// Builds the neutral report returned when model evaluation fails.
    pub fn neutral(reason: impl fmt::Display) -> Self {
        const UNAVAILABLE: &str = "Evaluation system error, unable to evaluate.";

        Self {
            accuracy_score: NEUTRAL_SCORE,
            relevance_score: NEUTRAL_SCORE,
            search_quality: Some(NEUTRAL_SCORE),
            citation_quality: NEUTRAL_SCORE,
            overall_score: NEUTRAL_SCORE,
            feedback: format!("Evaluation failed: {reason}. Using neutral scores."),
            strengths: UNAVAILABLE.to_string(),
            opportunity: UNAVAILABLE.to_string(),
            method: EvaluationMethod::Neutral,
        }
    }
}

/// Rounds to one decimal place, half away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
