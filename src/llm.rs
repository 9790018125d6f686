/// Chat completion client module.
///
/// Provides a blocking client for OpenAI-compatible chat completion APIs
/// (DeepSeek by default), the request types it sends, and the trait the
/// pipeline stages depend on.
mod client;
mod types;

pub use client::{ChatClient, ChatClientBuilder, ChatClientTrait, DEFAULT_BASE_URL, LlmError};
pub use types::{ChatMessage, ChatRequest, Role};
