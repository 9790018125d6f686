//! Answer generation over web search results.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::llm::{ChatClientTrait, ChatMessage, ChatRequest};
use crate::models::{AnswerResult, AnswerSource, SearchResult};
use crate::search::{SearchError, SearchOptions, SearchProvider};

use super::context::format_context;

/// System instruction for answer generation.
const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question using only the content in provided webpages from search results. Cite sources by their number in square brackets, e.g. [1].";

/// Prefix of the answer returned when no credential is configured.
pub const NO_CREDENTIAL_NOTICE: &str =
    "No DEEPSEEK_API_KEY set. Returning aggregated search snippets:\n\n";

/// Prefix of the answer returned when the completion call fails.
pub const MODEL_ERROR_PREFIX: &str = "DeepSeek API error: ";

/// Sampling and timeout parameters for the completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: ChatRequest::DEFAULT_MAX_TOKENS,
            temperature: ChatRequest::DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Retrieves search results and synthesizes a cited answer from them.
///
/// Without a chat client the generator never calls a model and returns the
/// raw context behind [`NO_CREDENTIAL_NOTICE`].
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use webrag::answerer::AnswerGenerator;
/// use webrag::config::ApiConfig;
/// use webrag::search::SearchProvider;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiConfig::from_env().chat_client()?;
/// let generator = AnswerGenerator::new(SearchProvider::duckduckgo()?).with_client(client);
///
/// let result = generator.generate_answer("What is Rust ownership?", 5, "deepseek-chat")?;
/// println!("{}", result.answer());
/// # Ok(())
/// # }
/// ```
pub struct AnswerGenerator {
    search: SearchProvider,
    client: Option<Arc<dyn ChatClientTrait>>,
    settings: GenerationSettings,
}

impl AnswerGenerator {
    /// Creates a generator with no chat client and default settings.
    pub fn new(search: SearchProvider) -> Self {
        Self {
            search,
            client: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Sets the chat client; `None` selects the no-credential fallback.
    pub fn with_client(mut self, client: Option<Arc<dyn ChatClientTrait>>) -> Self {
        self.client = client;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Searches for `query` and answers it from the top `max_results` hits.
    ///
    /// # Errors
    ///
    /// Only search errors that the provider propagates (invalid argument,
    /// unavailable backend) are returned. Completion failures are folded into
    /// the answer text.
    pub fn generate_answer(
        &self,
        query: &str,
        max_results: usize,
        model: &str,
    ) -> Result<AnswerResult, SearchError> {
        let sources = self.search.search(query, &SearchOptions::new(max_results))?;
        info!(count = sources.len(), "retrieved search results");
        Ok(self.answer_from_sources(query, sources, model))
    }

    /// Answers `query` from already retrieved sources.
    pub fn answer_from_sources(
        &self,
        query: &str,
        sources: Vec<SearchResult>,
        model: &str,
    ) -> AnswerResult {
        let context = format_context(&sources);

        let Some(client) = &self.client else {
            debug!("no completion credential configured, returning raw context");
            let answer = format!("{NO_CREDENTIAL_NOTICE}{context}");
            return AnswerResult::new(query, answer, sources, AnswerSource::NoCredential);
        };

        let request = ChatRequest::new(
            model,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(user_prompt(query, &context)),
            ],
        )
        .max_tokens(self.settings.max_tokens)
        .temperature(self.settings.temperature)
        .timeout(self.settings.timeout);

        match client.complete(&request) {
            Ok(text) => AnswerResult::new(query, text.trim(), sources, AnswerSource::Model),
            Err(e) => {
                warn!(error = %e, model, "answer generation failed, falling back to raw context");
                let answer = format!("{MODEL_ERROR_PREFIX}{e}\n\nFallback search results:\n{context}");
                AnswerResult::new(query, answer, sources, AnswerSource::ModelError)
            }
        }
    }
}

fn user_prompt(query: &str, context: &str) -> String {
    format!(
        "Question: {query}\n\nSearch results:\n{context}\n\nAnswer concisely and list which sources you used at the end."
    )
}
