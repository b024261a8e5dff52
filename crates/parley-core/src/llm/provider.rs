//! LlmProvider trait definition.
//!
//! This is the abstraction every model backend implements. Uses RPITIT for
//! `complete`; `BoxLlmProvider` adds dynamic dispatch on top.

use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Gemini, test doubles, etc.).
///
/// Implementations live in parley-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// The last message of `request.messages` is the new user prompt; the
    /// ones before it are the remembered conversation.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
