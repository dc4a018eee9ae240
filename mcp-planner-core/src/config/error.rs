use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("MCP server '{id}' is not configured")]
    UnknownServer { id: String },

    #[error("MCP server '{id}' has no url")]
    MissingUrl { id: String },
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NotFound { path } => {
                format!("Configuration file {} does not exist.", path.display())
            }
            ConfigError::Io { path, .. } => {
                format!("Configuration file {} could not be read.", path.display())
            }
            ConfigError::Parse { path, source } => {
                format!("Configuration file {} is invalid: {source}", path.display())
            }
            ConfigError::UnknownServer { id } => {
                format!("No [[servers]] entry with id \"{id}\". Add one or pass --url.")
            }
            ConfigError::MissingUrl { id } => {
                format!("Server \"{id}\" has no url. Set it in the config or pass --url.")
            }
        }
    }
}
