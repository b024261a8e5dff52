//! Chat orchestrator running one prompt through cache, limiter, and provider.
//!
//! `ChatOrchestrator` owns the process-wide rate limiter, response cache,
//! and conversation context, plus the model provider and chat log. One
//! instance is built at startup and shared (behind `Arc`) by the CLI loop and
//! the HTTP handlers.
//!
//! Only a completed exchange (cache hit or successful provider call) touches
//! the context, cache, or log. A rate-limited or failed call leaves all three
//! exactly as they were.

use std::time::Duration;

use chrono::Utc;
use parley_types::chat::{ChatLogRecord, ChatReply, LogStats, Message, NewChatLogRecord};
use parley_types::error::ChatError;
use parley_types::llm::{CompletionRequest, LlmError};
use tracing::{Instrument, debug, field, info_span, warn};

use crate::cache::ResponseCache;
use crate::chat::context::{ConversationContext, fingerprint_turns};
use crate::chat::repository::ChatLogRepository;
use crate::chat::tokens::exchange_tokens;
use crate::limiter::RateLimiter;
use crate::llm::BoxLlmProvider;

/// Per-process request settings for provider calls.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Model used when a request carries no override.
    pub model: String,
    pub temperature: Option<f64>,
    /// Upper bound on one provider call; exceeding it is an upstream failure.
    pub upstream_timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: Some(0.7),
            upstream_timeout: Duration::from_secs(30),
        }
    }
}

/// Composes admission control, caching, and conversation memory around a
/// model provider.
///
/// Generic over `ChatLogRepository` so parley-core never depends on
/// parley-infra.
pub struct ChatOrchestrator<R: ChatLogRepository> {
    limiter: RateLimiter,
    cache: ResponseCache,
    context: ConversationContext,
    provider: BoxLlmProvider,
    log: R,
    settings: ChatSettings,
}

impl<R: ChatLogRepository> ChatOrchestrator<R> {
    pub fn new(
        provider: BoxLlmProvider,
        log: R,
        limiter: RateLimiter,
        cache: ResponseCache,
        context: ConversationContext,
        settings: ChatSettings,
    ) -> Self {
        Self {
            limiter,
            cache,
            context,
            provider,
            log,
            settings,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn log(&self) -> &R {
        &self.log
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Model used when a request carries no override.
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Answer `prompt` with the default model.
    pub async fn chat(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        self.chat_with_model(prompt, None).await
    }

    /// Answer `prompt`, optionally with a model other than the default.
    ///
    /// The override takes part in the cache key, the provider request, and
    /// the log record.
    pub async fn chat_with_model(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.settings.model.as_str());

        // History before this turn feeds both the cache key and the request.
        let history = self.context.snapshot();
        let fingerprint = fingerprint_turns(&history);

        if let Some(cached) = self.cache.lookup(prompt, model, &fingerprint) {
            self.context.append_exchange(prompt, &cached);
            return Ok(self.record(prompt, cached, model, true).await);
        }

        self.limiter.admit()?;

        let response = self.invoke(history, prompt, model).await?;
        self.cache.insert(prompt, model, &fingerprint, response.as_str());
        self.context.append_exchange(prompt, &response);
        Ok(self.record(prompt, response, model, false).await)
    }

    async fn invoke(
        &self,
        history: Vec<Message>,
        prompt: &str,
        model: &str,
    ) -> Result<String, ChatError> {
        let mut messages = history;
        messages.push(Message::user(prompt));
        let request = CompletionRequest {
            model: model.to_string(),
            messages,
            temperature: self.settings.temperature,
            max_tokens: None,
        };

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            history_len = request.messages.len() - 1,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
        );

        let timeout = self.settings.upstream_timeout;
        let call = self.provider.complete(&request).instrument(span.clone());
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(response)) => {
                span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
                span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
                Ok(response.content)
            }
            Ok(Err(e)) => {
                warn!(error = %e, model, "upstream call failed");
                Err(ChatError::Upstream(e))
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), model, "upstream call timed out");
                Err(ChatError::Upstream(LlmError::Timeout {
                    after_secs: timeout.as_secs(),
                }))
            }
        }
    }

    /// Best-effort log write. A store failure is reported and swallowed.
    async fn record(
        &self,
        prompt: &str,
        response: String,
        model: &str,
        was_cached: bool,
    ) -> ChatReply {
        let tokens_used = exchange_tokens(prompt, &response);
        let record = NewChatLogRecord {
            prompt: prompt.to_string(),
            response: response.clone(),
            tokens_used,
            created_at: Utc::now(),
            model: model.to_string(),
            was_cached,
        };

        let log_id = match self.log.append(&record).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, was_cached, "failed to record chat exchange");
                None
            }
        };
        debug!(was_cached, tokens_used, ?log_id, "chat exchange complete");

        ChatReply {
            response,
            tokens_used,
            was_cached,
            model: model.to_string(),
            log_id,
        }
    }

    // --- Log administration ---

    pub async fn history(&self, limit: u32) -> Result<Vec<ChatLogRecord>, ChatError> {
        Ok(self.log.recent(limit).await?)
    }

    pub async fn log_stats(&self) -> Result<LogStats, ChatError> {
        Ok(self.log.stats().await?)
    }

    pub async fn log_count(&self) -> Result<i64, ChatError> {
        Ok(self.log.count().await?)
    }

    pub async fn clear_log(&self) -> Result<u64, ChatError> {
        Ok(self.log.delete_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmProvider;
    use parley_types::chat::MessageRole;
    use parley_types::error::RepositoryError;
    use parley_types::llm::{CompletionResponse, Usage};
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    // --- Test doubles ---

    #[derive(Clone)]
    enum Behaviour {
        Reply(String),
        Fail,
        Hang,
    }

    #[derive(Clone)]
    struct MockProvider {
        behaviour: Behaviour,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl MockProvider {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn complete(
            &self,
            request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let behaviour = self.behaviour.clone();
            let model = request.model.clone();
            async move {
                match behaviour {
                    Behaviour::Reply(content) => Ok(CompletionResponse {
                        content,
                        model,
                        usage: Usage::default(),
                    }),
                    Behaviour::Fail => Err(LlmError::Provider {
                        message: "boom".to_string(),
                    }),
                    Behaviour::Hang => std::future::pending().await,
                }
            }
        }
    }

    #[derive(Default)]
    struct MemoryLog {
        records: Mutex<Vec<ChatLogRecord>>,
        fail_writes: AtomicBool,
    }

    impl MemoryLog {
        fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }

        fn cached_flags(&self) -> Vec<bool> {
            self.records.lock().unwrap().iter().map(|r| r.was_cached).collect()
        }
    }

    impl ChatLogRepository for MemoryLog {
        async fn append(&self, record: &NewChatLogRecord) -> Result<i64, RepositoryError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            let id = records.len() as i64 + 1;
            records.push(ChatLogRecord {
                id,
                prompt: record.prompt.clone(),
                response: record.response.clone(),
                tokens_used: record.tokens_used,
                created_at: record.created_at,
                model: record.model.clone(),
                was_cached: record.was_cached,
            });
            Ok(id)
        }

        async fn recent(&self, limit: u32) -> Result<Vec<ChatLogRecord>, RepositoryError> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().rev().take(limit as usize).cloned().collect())
        }

        async fn stats(&self) -> Result<LogStats, RepositoryError> {
            let records = self.records.lock().unwrap();
            Ok(LogStats {
                total_entries: records.len() as i64,
                ..Default::default()
            })
        }

        async fn count(&self) -> Result<i64, RepositoryError> {
            Ok(self.records.lock().unwrap().len() as i64)
        }

        async fn delete_all(&self) -> Result<u64, RepositoryError> {
            let mut records = self.records.lock().unwrap();
            let n = records.len() as u64;
            records.clear();
            Ok(n)
        }
    }

    fn orchestrator(provider: MockProvider, rpm: u32) -> ChatOrchestrator<MemoryLog> {
        ChatOrchestrator::new(
            BoxLlmProvider::new(provider),
            MemoryLog::default(),
            RateLimiter::new(rpm),
            ResponseCache::new(50, Duration::from_secs(300)),
            ConversationContext::new(4),
            ChatSettings {
                model: "test-model".to_string(),
                temperature: Some(0.7),
                upstream_timeout: Duration::from_secs(5),
            },
        )
    }

    // --- Tests ---

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_hit_then_rate_limited() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider.clone(), 1);

        let first = orch.chat("hi").await.unwrap();
        assert_eq!(first.response, "hello");
        assert!(!first.was_cached);
        assert_eq!(first.log_id, Some(1));
        assert_eq!(orch.cache().stats().size, 1);
        assert_eq!(orch.context().len(), 2);
        assert_eq!(orch.log().cached_flags(), vec![false]);
        let tokens_after_first = orch.limiter().status().available_tokens;

        // Same prompt under the same (empty) history as the first call.
        orch.context().clear();
        let second = orch.chat("hi").await.unwrap();
        assert!(second.was_cached);
        assert_eq!(second.response, "hello");
        assert_eq!(orch.log().cached_flags(), vec![false, true]);
        assert_eq!(orch.limiter().status().available_tokens, tokens_after_first);
        assert_eq!(provider.calls(), 1);

        let err = orch.chat("bye").await.unwrap_err();
        assert!(matches!(err, ChatError::RateLimited { .. }));
        assert_eq!(orch.log().len(), 2);
        assert_eq!(orch.context().len(), 2);
        assert_eq!(orch.cache().stats().size, 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_prompt_with_new_history_misses() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider.clone(), 10);

        orch.chat("hi").await.unwrap();
        let again = orch.chat("hi").await.unwrap();

        assert!(!again.was_cached);
        assert_eq!(provider.calls(), 2);
        assert_eq!(orch.cache().stats().size, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_never_consumes_budget() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider.clone(), 3);

        orch.chat("hi").await.unwrap();
        let before = orch.limiter().status().available_tokens;
        for _ in 0..5 {
            orch.context().clear();
            assert!(orch.chat("hi").await.unwrap().was_cached);
        }
        assert_eq!(orch.limiter().status().available_tokens, before);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_call_leaves_no_trace() {
        let provider = MockProvider::new(Behaviour::Reply("ok".to_string()));
        let orch = orchestrator(provider.clone(), 1);
        orch.chat("first").await.unwrap();

        let size = orch.cache().stats().size;
        let turns = orch.context().snapshot();
        let err = orch.chat("second").await.unwrap_err();

        match err {
            ChatError::RateLimited { retry_after, .. } => {
                assert!(retry_after > Duration::ZERO);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
        assert_eq!(orch.cache().stats().size, size);
        assert_eq!(orch.context().snapshot(), turns);
        assert_eq!(orch.log().len(), 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_failure_leaves_no_trace() {
        let provider = MockProvider::new(Behaviour::Fail);
        let orch = orchestrator(provider.clone(), 10);

        let err = orch.chat("hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Upstream(LlmError::Provider { .. })));
        assert_eq!(orch.cache().stats().size, 0);
        assert!(orch.context().is_empty());
        assert_eq!(orch.log().len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_timeout_is_upstream_failure() {
        let provider = MockProvider::new(Behaviour::Hang);
        let orch = orchestrator(provider.clone(), 10);

        let err = orch.chat("hi").await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Upstream(LlmError::Timeout { after_secs: 5 })
        ));
        assert!(orch.context().is_empty());
        assert_eq!(orch.log().len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_failure_does_not_fail_exchange() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider.clone(), 10);
        orch.log().fail_writes.store(true, Ordering::SeqCst);

        let reply = orch.chat("hi").await.unwrap();
        assert_eq!(reply.response, "hello");
        assert_eq!(reply.log_id, None);
        assert_eq!(orch.context().len(), 2);
        assert_eq!(orch.cache().stats().size, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_carries_history_then_prompt() {
        let provider = MockProvider::new(Behaviour::Reply("r".to_string()));
        let orch = orchestrator(provider.clone(), 10);

        orch.chat("one").await.unwrap();
        orch.chat("two").await.unwrap();

        let requests = provider.requests.lock().unwrap();
        let last = &requests[1];
        assert_eq!(
            last.messages,
            vec![
                Message::user("one"),
                Message::assistant("r"),
                Message::user("two"),
            ]
        );
        assert_eq!(last.model, "test-model");
        assert_eq!(last.temperature, Some(0.7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_override_is_part_of_cache_key() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider.clone(), 10);

        let a = orch.chat_with_model("hi", Some("other-model")).await.unwrap();
        assert_eq!(a.model, "other-model");
        orch.context().clear();

        let b = orch.chat("hi").await.unwrap();
        assert!(!b.was_cached);
        assert_eq!(b.model, "test-model");
        orch.context().clear();

        let c = orch.chat_with_model("hi", Some("other-model")).await.unwrap();
        assert!(c.was_cached);
        assert_eq!(provider.calls(), 2);
        assert_eq!(provider.requests.lock().unwrap()[0].model, "other-model");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_model_override_uses_default() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider.clone(), 10);
        let reply = orch.chat_with_model("hi", Some("  ")).await.unwrap();
        assert_eq!(reply.model, "test-model");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_prompt_rejected_without_side_effects() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider.clone(), 1);

        assert!(matches!(orch.chat("   ").await, Err(ChatError::EmptyPrompt)));
        assert_eq!(orch.limiter().status().available_tokens, 1);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_used_estimate_is_logged() {
        let provider = MockProvider::new(Behaviour::Reply("hello".to_string()));
        let orch = orchestrator(provider, 10);
        let reply = orch.chat("hi").await.unwrap();
        assert_eq!(reply.tokens_used, 3);
        let records = orch.history(10).await.unwrap();
        assert_eq!(records[0].tokens_used, 3);
        assert_eq!(records[0].model, "test-model");
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_window_slides_over_many_exchanges() {
        let provider = MockProvider::new(Behaviour::Reply("ok".to_string()));
        let orch = orchestrator(provider, 60);
        for i in 0..6 {
            orch.chat(&format!("q{i}")).await.unwrap();
        }
        let turns = orch.context().snapshot();
        assert_eq!(turns.len(), 8);
        assert_eq!(turns[0].role, MessageRole::User);
        assert_eq!(turns[0].content, "q2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_administration_passes_through() {
        let provider = MockProvider::new(Behaviour::Reply("ok".to_string()));
        let orch = orchestrator(provider, 60);
        orch.chat("a").await.unwrap();
        orch.chat("b").await.unwrap();

        assert_eq!(orch.log_count().await.unwrap(), 2);
        assert_eq!(orch.history(1).await.unwrap()[0].prompt, "b");
        assert_eq!(orch.log_stats().await.unwrap().total_entries, 2);
        assert_eq!(orch.clear_log().await.unwrap(), 2);
        assert_eq!(orch.log_count().await.unwrap(), 0);
    }
}
