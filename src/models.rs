mod answer;
mod evaluation;
mod search_result;

pub use answer::{AnswerResult, AnswerSource};
pub use evaluation::{
    ACCURACY_WEIGHT, CITATION_WEIGHT, EvaluationMethod, EvaluationReport, NEUTRAL_SCORE,
    RELEVANCE_WEIGHT, SEARCH_QUALITY_WEIGHT, round_one_decimal,
};
pub use search_result::SearchResult;
