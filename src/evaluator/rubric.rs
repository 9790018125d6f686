//! Rubric prompt construction and response parsing for model-based evaluation.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{EvaluationReport, NEUTRAL_SCORE, SearchResult};

use super::EvaluationError;

const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// Formats sources as a bulleted list for the rubric prompt.
pub fn format_sources(sources: &[SearchResult]) -> String {
    sources
        .iter()
        .map(|s| {
            format!(
                "- {}: {}\n  {}",
                s.title().unwrap_or("N/A"),
                s.url().unwrap_or("N/A"),
                s.description().unwrap_or(""),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the evaluation prompt.
pub fn build_prompt(query: &str, answer: &str, sources: &[SearchResult]) -> String {
    let sources_text = format_sources(sources);
    format!(
        r#"You are an expert evaluator assessing an agent's response to a query based on the source material it used.

User Query: {query}

Generated Answer:
{answer}

Source Material Used:
{sources_text}

Evaluate the response on these criteria:
1. **Accuracy (0-10)**: How factually correct and supported by the sources is the answer?
2. **Relevance (0-10)**: How directly and completely does the answer address the user's query?
3. **Search quality (0-10)**: Are the search results complete, up to date and authoritative for the query?
4. **Citation Quality (0-10)**: Are sources properly cited and used appropriately?

Respond in JSON format only with this exact structure (no markdown, no code blocks):
{{
  "accuracy_score": <int 0-10>,
  "relevance_score": <int 0-10>,
  "search_quality": <int 0-10>,
  "citation_quality": <int 0-10>,
  "feedback": "<brief explanation of scores>",
  "strengths": "<what the response does well>",
  "opportunity": "<what could be improved>"
}}"#
    )
}

/// Extracts the outermost JSON object from model output.
pub(crate) fn extract_json(response: &str) -> Option<&str> {
    let trimmed = response.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;

    if start <= end {
        Some(&trimmed[start..=end])
    } else {
        None
    }
}

/// Parses model output into a weighted report.
///
/// A reply that is valid JSON on its own must be an object. Otherwise the
/// outermost object is cut out of surrounding prose or code fences. Missing
/// score fields default to the neutral score; missing text fields default to
/// empty strings. Scores are neither clamped nor rounded; `null` or
/// non-numeric scores make the reply malformed.
pub fn parse_report(response: &str) -> Result<EvaluationReport, EvaluationError> {
    let value = match serde_json::from_str::<Value>(response.trim()) {
        Ok(value) => value,
        Err(_) => {
            let json_str = extract_json(response).ok_or_else(|| {
                EvaluationError::Malformed("no JSON object in model response".to_string())
            })?;
            serde_json::from_str(json_str)
                .map_err(|e| EvaluationError::Malformed(format!("invalid JSON: {e}")))?
        }
    };

    let obj = value
        .as_object()
        .ok_or_else(|| EvaluationError::Malformed("expected a JSON object".to_string()))?;

    Ok(EvaluationReport::weighted(
        score(obj, "accuracy_score")?,
        score(obj, "relevance_score")?,
        score(obj, "search_quality")?,
        score(obj, "citation_quality")?,
        text(obj, "feedback"),
        text(obj, "strengths"),
        text(obj, "opportunity"),
    ))
}

fn score(obj: &Map<String, Value>, key: &str) -> Result<f64, EvaluationError> {
    let Some(value) = obj.get(key) else {
        return Ok(NEUTRAL_SCORE);
    };

    let score = value
        .as_f64()
        .ok_or_else(|| EvaluationError::Malformed(format!("{key} is not a number: {value}")))?;

    if !SCORE_RANGE.contains(&score) {
        warn!(key, score, "model returned a score outside 0-10, using it as is");
    }
    Ok(score)
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
