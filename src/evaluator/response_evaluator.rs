//! Answer quality evaluation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::answerer::GenerationSettings;
use crate::llm::{ChatClientTrait, ChatMessage, ChatRequest, LlmError};
use crate::models::{EvaluationReport, SearchResult};

use super::heuristic::heuristic_report;
use super::rubric::{build_prompt, parse_report};

/// Failures on the model evaluation path. Never escapes [`ResponseEvaluator::evaluate`].
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The completion call itself failed.
    #[error(transparent)]
    ModelCall(#[from] LlmError),

    /// The completion succeeded but did not contain the expected JSON.
    #[error("Malformed evaluation response: {0}")]
    Malformed(String),
}

/// Scores generated answers with a rubric prompt, or heuristically when no
/// chat client is configured.
pub struct ResponseEvaluator {
    client: Option<Arc<dyn ChatClientTrait>>,
    settings: GenerationSettings,
}

impl ResponseEvaluator {
    /// Creates an evaluator; `None` selects the heuristic path.
    pub fn new(client: Option<Arc<dyn ChatClientTrait>>) -> Self {
        Self {
            client,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Evaluates `answer` against `query` and `sources`.
    ///
    /// Always returns a report. Model failures produce the neutral report
    /// with the error named in `feedback`.
    pub fn evaluate(
        &self,
        query: &str,
        answer: &str,
        sources: &[SearchResult],
        model: &str,
    ) -> EvaluationReport {
        let Some(client) = &self.client else {
            debug!("no completion credential configured, using heuristic evaluation");
            return heuristic_report(answer, sources);
        };

        match self.evaluate_with_model(client.as_ref(), query, answer, sources, model) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, model, "model evaluation failed, using neutral scores");
                EvaluationReport::neutral(e)
            }
        }
    }

    fn evaluate_with_model(
        &self,
        client: &dyn ChatClientTrait,
        query: &str,
        answer: &str,
        sources: &[SearchResult],
        model: &str,
    ) -> Result<EvaluationReport, EvaluationError> {
        let request = ChatRequest::new(
            model,
            vec![ChatMessage::user(build_prompt(query, answer, sources))],
        )
        .max_tokens(self.settings.max_tokens)
        .temperature(self.settings.temperature)
        .timeout(self.settings.timeout);

        let response = client.complete(&request)?;
        parse_report(response.trim())
    }
}
