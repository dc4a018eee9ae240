use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::env;

const AUTHORIZATION: &str = "Authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// One MCP server endpoint from the `[[servers]]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Default arguments merged into every tool call; the step's own arguments win.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ServerConfig {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Value of the `Authorization` header, matched case-insensitively.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(AUTHORIZATION))
            .map(|(_, value)| value.as_str())
    }

    /// Bearer token taken from the `Authorization` header; empty when absent.
    pub fn bearer_token(&self) -> String {
        let value = self.authorization().unwrap_or_default();
        value.strip_prefix(BEARER_PREFIX).unwrap_or(value).to_string()
    }

    /// Name of the environment variable holding this server's API key.
    pub fn api_key_env_var(&self) -> String {
        format!("{}_API_KEY", self.id.to_uppercase())
    }

    /// Adds `Authorization: Bearer <key>` from `{ID}_API_KEY` when no header is configured.
    pub fn apply_env_api_key(&mut self) -> bool {
        if self.authorization().is_some() {
            return false;
        }
        match env::var(self.api_key_env_var()) {
            Ok(key) if !key.trim().is_empty() => {
                self.headers
                    .insert(AUTHORIZATION.to_string(), format!("{BEARER_PREFIX}{}", key.trim()));
                true
            }
            _ => false,
        }
    }
}
