//! Application state wiring the orchestrator to its concrete collaborators.
//!
//! `RuntimeConfig` resolves the data directory, config file, environment
//! overrides, and database location. `AppState` pins `ChatOrchestrator` to
//! the SQLite chat log and the Gemini provider and is shared by the CLI chat
//! loop and the REST API handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parley_core::cache::ResponseCache;
use parley_core::chat::ConversationContext;
use parley_core::chat::orchestrator::{ChatOrchestrator, ChatSettings};
use parley_core::limiter::RateLimiter;
use parley_core::llm::BoxLlmProvider;
use parley_infra::config::{
    api_key, apply_env_overrides, database_path, env_lookup, load_config, resolve_data_dir,
};
use parley_infra::llm::create_provider;
use parley_infra::sqlite::chat_log::SqliteChatLogRepository;
use parley_infra::sqlite::pool::{DatabasePool, database_url};
use parley_types::config::ParleyConfig;

/// Orchestrator pinned to the infra implementations.
pub type ConcreteOrchestrator = ChatOrchestrator<SqliteChatLogRepository>;

/// Resolved configuration for one process.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config: ParleyConfig,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
}

impl RuntimeConfig {
    /// Resolve the data dir, read `config.toml`, and apply env overrides.
    pub async fn load() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let mut config = load_config(&data_dir).await;
        apply_env_overrides(&mut config, env_lookup);

        Ok(Self::new(config, data_dir))
    }

    pub fn new(config: ParleyConfig, data_dir: PathBuf) -> Self {
        let database_path = database_path(&config, &data_dir);
        Self {
            config,
            data_dir,
            database_path,
        }
    }

    /// Open (creating and migrating if needed) the chat log database.
    pub async fn open_log(&self) -> anyhow::Result<SqliteChatLogRepository> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let pool = DatabasePool::new(&database_url(&self.database_path)).await?;
        Ok(SqliteChatLogRepository::new(pool))
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub runtime: Arc<RuntimeConfig>,
}

impl AppState {
    /// Build the production state: requires `GEMINI_API_KEY`.
    pub async fn init(runtime: RuntimeConfig) -> anyhow::Result<Self> {
        let key = api_key(env_lookup)?;
        let provider = create_provider(
            key,
            Duration::from_secs(runtime.config.upstream_timeout_secs),
        )?;
        let log = runtime.open_log().await?;

        tracing::info!(
            model = %runtime.config.model,
            database = %runtime.database_path.display(),
            "Parley initialized"
        );

        Ok(Self::new(runtime, provider, log))
    }

    /// Wire the orchestrator from configuration and ready collaborators.
    pub fn new(runtime: RuntimeConfig, provider: BoxLlmProvider, log: SqliteChatLogRepository) -> Self {
        let config = &runtime.config;
        let orchestrator = ChatOrchestrator::new(
            provider,
            log,
            RateLimiter::new(config.rate_limit.requests_per_minute),
            ResponseCache::new(config.cache.max_size, Duration::from_secs(config.cache.ttl_secs)),
            ConversationContext::new(config.memory.exchanges),
            ChatSettings {
                model: config.model.clone(),
                temperature: Some(config.temperature),
                upstream_timeout: Duration::from_secs(config.upstream_timeout_secs),
            },
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            runtime: Arc::new(runtime),
        }
    }
}
