//! Configuration and credential loading for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! and deserializes it into [`ParleyConfig`], falling back to defaults when
//! the file is missing or malformed. Environment variables (optionally from a
//! `.env` file) override the model and request rate and supply the Gemini
//! API key.

use std::path::{Path, PathBuf};

use parley_types::config::{ParleyConfig, RateLimitConfig};
use parley_types::error::ChatError;
use secrecy::SecretString;

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable overriding the default model.
pub const MODEL_VAR: &str = "GEMINI_MODEL";

/// Environment variable overriding the requests-per-minute limit.
pub const REQUESTS_PER_MINUTE_VAR: &str = "PARLEY_REQUESTS_PER_MINUTE";

/// Environment variable overriding the data directory.
pub const DATA_DIR_VAR: &str = "PARLEY_DATA_DIR";

/// Load `.env` from the working directory (or a parent) if one exists.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("Failed to load .env: {err}"),
    }
}

/// Resolve the data directory: `PARLEY_DATA_DIR`, else `~/.parley`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_VAR) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parley")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ParleyConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config, with out-of-range values replaced
///   (see [`sanitize_config`]).
pub async fn load_config(data_dir: &Path) -> ParleyConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ParleyConfig::default();
        }
    };

    match toml::from_str::<ParleyConfig>(&content) {
        Ok(config) => sanitize_config(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ParleyConfig::default()
        }
    }
}

/// Replace values the runtime cannot work with by their defaults.
///
/// A zero `requests_per_minute` would leave the limiter with no capacity and
/// no refill, so it falls back to the default rate with a warning.
pub fn sanitize_config(mut config: ParleyConfig) -> ParleyConfig {
    if config.rate_limit.requests_per_minute == 0 {
        let fallback = RateLimitConfig::default().requests_per_minute;
        tracing::warn!(
            "rate_limit.requests_per_minute must be at least 1, using {fallback}"
        );
        config.rate_limit.requests_per_minute = fallback;
    }
    config
}

/// Apply environment overrides read through `lookup`.
///
/// Unparseable or zero request rates are ignored with a warning.
pub fn apply_env_overrides(config: &mut ParleyConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(model) = lookup(MODEL_VAR).filter(|m| !m.trim().is_empty()) {
        config.model = model.trim().to_string();
    }

    if let Some(raw) = lookup(REQUESTS_PER_MINUTE_VAR) {
        match raw.trim().parse::<u32>() {
            Ok(rpm) if rpm > 0 => config.rate_limit.requests_per_minute = rpm,
            _ => tracing::warn!("Ignoring invalid {REQUESTS_PER_MINUTE_VAR}={raw:?}"),
        }
    }
}

/// Read the Gemini API key through `lookup`.
///
/// A missing or blank key is `ChatError::ConfigurationMissing`; the caller
/// refuses to build the orchestrator without one.
pub fn api_key(lookup: impl Fn(&str) -> Option<String>) -> Result<SecretString, ChatError> {
    match lookup(API_KEY_VAR) {
        Some(key) if !key.trim().is_empty() => Ok(SecretString::from(key.trim().to_string())),
        _ => Err(ChatError::ConfigurationMissing(format!(
            "{API_KEY_VAR} is not set. Add it to your environment or a .env file."
        ))),
    }
}

/// Process environment lookup for [`apply_env_overrides`] and [`api_key`].
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Database file location: the configured override, else `{data_dir}/parley.db`.
pub fn database_path(config: &ParleyConfig, data_dir: &Path) -> PathBuf {
    config
        .database_path
        .clone()
        .unwrap_or_else(|| data_dir.join("parley.db"))
}
