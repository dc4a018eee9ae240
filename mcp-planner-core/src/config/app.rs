use super::error::ConfigError;
use super::llm::LlmConfig;
use super::server::ServerConfig;
use std::path::Path;

/// Application configuration loaded from client.toml
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub servers: Vec<ServerConfig>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    pub fn server(&self, id: &str) -> Option<&ServerConfig> {
        self.servers.iter().rev().find(|server| server.id == id)
    }
}
