//! Named MCP server endpoints and per-invocation overrides.

use super::client::{ClientConfig, McpClient, McpError};
use crate::config::{AppConfig, ConfigError, LlmConfig, ServerConfig};
use crate::infrastructure::model::ModelProvider;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Values supplied at invocation time that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerOverrides {
    pub url: Option<String>,
    /// Merged over the configured headers.
    pub headers: BTreeMap<String, String>,
    /// Merged over the configured default tool params.
    pub params: Map<String, Value>,
}

impl ServerOverrides {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerRegistry {
    servers: Vec<ServerConfig>,
}

impl ServerRegistry {
    pub fn new(servers: Vec<ServerConfig>) -> Self {
        Self { servers }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.servers.clone())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.servers.iter().map(|server| server.id.as_str()).collect()
    }

    /// Later entries shadow earlier ones with the same id.
    pub fn get(&self, id: &str) -> Option<&ServerConfig> {
        self.servers.iter().rev().find(|server| server.id == id)
    }

    /// Effective settings for `id` after overrides and `{ID}_API_KEY`.
    ///
    /// An id missing from the registry is accepted only when `overrides` names a url.
    pub fn resolve(&self, id: &str, overrides: &ServerOverrides) -> Result<ServerConfig, ConfigError> {
        let mut server = match (self.get(id), overrides.url.as_deref()) {
            (Some(server), _) => server.clone(),
            (None, Some(_)) => ServerConfig {
                id: id.to_string(),
                ..ServerConfig::default()
            },
            (None, None) => return Err(ConfigError::UnknownServer { id: id.to_string() }),
        };

        if let Some(url) = overrides.url.as_deref().filter(|url| !url.trim().is_empty()) {
            server.url = Some(url.to_string());
        }
        for (name, value) in &overrides.headers {
            // Header names are case-insensitive on the wire.
            server
                .headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            server.headers.insert(name.clone(), value.clone());
        }
        server.params.extend(overrides.params.clone());

        if server.apply_env_api_key() {
            debug!(server = id, env_var = %server.api_key_env_var(), "Using API key from environment");
        }

        match server.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(server),
            _ => Err(ConfigError::MissingUrl { id: id.to_string() }),
        }
    }

    /// Resolves `id` and connects an HTTP-backed client to it.
    pub fn client(
        &self,
        id: &str,
        overrides: &ServerOverrides,
        llm: &LlmConfig,
        provider: Option<Arc<dyn ModelProvider>>,
    ) -> Result<McpClient, McpError> {
        let server = self.resolve(id, overrides)?;
        McpClient::connect(ClientConfig::from_llm(server, llm), provider)
    }
}
