//! Provider factory - creates a model client from `[llm]` settings

use super::clients::{OllamaClient, OpenAIClient};
use super::traits::ModelProvider;
use crate::config::LlmConfig;
use std::env;
use std::sync::Arc;
use tracing::warn;

/// Resolve API key from the environment variable named by `env_var`
pub fn resolve_api_key(provider: &str, env_var: Option<&str>) -> Option<String> {
    let raw = env_var.map(str::trim)?;
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        Ok(_) => {
            warn!(provider, env_var = raw, "API key environment variable is empty");
            None
        }
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating model clients from `[llm]` settings.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Creates a model client based on provider type.
    ///
    /// Supported types:
    /// - `ollama`, `localai` → Ollama format, no key needed
    /// - Others → OpenAI-compatible format (default)
    ///
    /// Returns `None` when the provider needs an API key and none is available.
    pub fn create(config: &LlmConfig) -> Option<Arc<dyn ModelProvider>> {
        if config.is_ollama() {
            return Some(Arc::new(OllamaClient::from_config(config)));
        }
        let api_key = resolve_api_key(&config.provider_type, config.api_key.as_deref())?;
        Some(Arc::new(OpenAIClient::from_config(config, api_key)))
    }
}
