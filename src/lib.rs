pub mod answerer;
pub mod config;
pub mod evaluator;
pub mod llm;
pub mod logging;
pub mod models;
pub mod search;

pub use answerer::AnswerGenerator;
pub use config::ApiConfig;
pub use evaluator::ResponseEvaluator;
pub use llm::{ChatClient, ChatClientBuilder, ChatClientTrait, LlmError};
pub use models::{AnswerResult, AnswerSource, EvaluationMethod, EvaluationReport, SearchResult};
pub use search::{SearchError, SearchOptions, SearchProvider};
