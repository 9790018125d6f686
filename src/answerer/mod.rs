//! Retrieval-augmented answer generation.
//!
//! This module provides the `AnswerGenerator`, which turns web search results
//! into a numbered context and asks an OpenAI-compatible model for an answer
//! that cites them by number.

mod context;
mod generator;

pub use context::{format_context, format_source};
pub use generator::{AnswerGenerator, GenerationSettings, MODEL_ERROR_PREFIX, NO_CREDENTIAL_NOTICE};
