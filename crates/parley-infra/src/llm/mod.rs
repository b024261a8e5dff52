//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `parley-core`, and a factory ([`create_provider`]) that wraps it in a
//! [`BoxLlmProvider`] for the orchestrator.
//!
//! [`LlmProvider`]: parley_core::llm::provider::LlmProvider

pub mod gemini;

use std::time::Duration;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Create the production [`BoxLlmProvider`].
///
/// The HTTP client timeout is set a little above the orchestrator's upstream
/// timeout so the orchestrator reports the timeout, not reqwest.
pub fn create_provider(
    api_key: SecretString,
    upstream_timeout: Duration,
) -> Result<BoxLlmProvider, LlmError> {
    let provider = GeminiProvider::new(api_key, upstream_timeout + Duration::from_secs(5))?;
    Ok(BoxLlmProvider::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_is_gemini() {
        let provider =
            create_provider(SecretString::from("test-key"), Duration::from_secs(30)).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
