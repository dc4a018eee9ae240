use crate::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_MODEL, DEFAULT_OPENAI_ENDPOINT, SYNTHESIS_MAX_TOKENS,
};
use serde::{Deserialize, Serialize};

/// Language model settings from the optional `[llm]` section.
///
/// ```toml
/// [llm]
/// type = "openai"
/// endpoint = "https://api.openai.com"
/// api_key = "OPENAI_API_KEY"
/// planner_model = "gpt-4o-mini"
/// synthesis_model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "openai" for OpenAI-compatible APIs, "ollama" for a local Ollama server
    #[serde(rename = "type")]
    pub provider_type: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key: Option<String>,
    /// Custom API path override (e.g. "/v1/chat/completions")
    pub api_path: Option<String>,
    pub planner_model: String,
    pub synthesis_model: String,
    pub synthesis_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider_type: "openai".to_string(),
            endpoint: DEFAULT_OPENAI_ENDPOINT.to_string(),
            api_key: Some(DEFAULT_API_KEY_ENV.to_string()),
            api_path: None,
            planner_model: DEFAULT_MODEL.to_string(),
            synthesis_model: DEFAULT_MODEL.to_string(),
            synthesis_max_tokens: SYNTHESIS_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    pub fn is_ollama(&self) -> bool {
        matches!(
            self.provider_type.to_lowercase().as_str(),
            "ollama" | "localai"
        )
    }
}
