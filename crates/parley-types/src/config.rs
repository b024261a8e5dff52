//! Configuration types for Parley.
//!
//! `ParleyConfig` represents the top-level `config.toml` that controls the
//! model, request rate, cache sizing, conversation memory, and the HTTP
//! listener.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for Parley.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParleyConfig {
    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for completions.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Upper bound on a single provider call, in seconds.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Override for the SQLite database location (defaults to `{data_dir}/parley.db`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            memory: MemoryConfig::default(),
            server: ServerConfig::default(),
            database_path: None,
        }
    }
}

/// Admission control for upstream calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_requests_per_minute() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

/// Response cache sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_max_size() -> usize {
    50
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: default_cache_max_size(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Conversation memory window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Number of remembered exchanges; the context keeps twice as many turns.
    #[serde(default = "default_memory_exchanges")]
    pub exchanges: usize,
}

fn default_memory_exchanges() -> usize {
    4
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            exchanges: default_memory_exchanges(),
        }
    }
}

/// HTTP listener address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
