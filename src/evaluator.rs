//! Response quality evaluation.
//!
//! A model-backed rubric path and a heuristic fallback for when no completion
//! credential is configured.
mod heuristic;
mod response_evaluator;
mod rubric;

pub use heuristic::heuristic_report;
pub use response_evaluator::{EvaluationError, ResponseEvaluator};
pub use rubric::{build_prompt, format_sources, parse_report};
