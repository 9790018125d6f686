//! Rule-based evaluation used when no completion credential is configured.

use crate::models::{EvaluationMethod, EvaluationReport, SearchResult, round_one_decimal};

const FEEDBACK: &str = "Heuristic evaluation (no LLM available). Actual quality may vary.";
const OPPORTUNITY: &str = "Use OpenAI API key for evaluation";

/// Scores an answer from shallow textual signals.
///
/// Pure function of its inputs. `search_quality` is never scored.
pub fn heuristic_report(answer: &str, sources: &[SearchResult]) -> EvaluationReport {
    let word_count = answer.split_whitespace().count();
    let has_citations = answer.contains('[') && answer.contains(']');

    let accuracy_score = if sources.is_empty() { 4.0 } else { 6.0 };
    let relevance_score = if word_count > 20 { 7.0 } else { 5.0 };
    let citation_quality = if has_citations { 8.0 } else { 4.0 };

    let mean = (accuracy_score + relevance_score + citation_quality) / 3.0;

    EvaluationReport {
        accuracy_score,
        relevance_score,
        search_quality: None,
        citation_quality,
        overall_score: round_one_decimal(mean),
        feedback: FEEDBACK.to_string(),
        strengths: if word_count > 10 {
            "Response generated successfully".to_string()
        } else {
            "Short response".to_string()
        },
        opportunity: OPPORTUNITY.to_string(),
        method: EvaluationMethod::Heuristic,
    }
}
