use super::AppConfig;
use super::env::substitute_env_vars;
use super::error::ConfigError;
use super::llm::LlmConfig;
use super::server::ServerConfig;
use crate::constants::{CONFIG_PATH, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use toml::{Table, Value};
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    llm: Option<LlmConfig>,
    #[serde(default)]
    servers: Vec<ServerConfig>,
}

/// Ensures environment variables are loaded from .env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load configuration from a file path.
///
/// Without an explicit path the default location is tried and a missing file
/// yields an empty configuration. An explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(&expand_path(path)),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                debug!(path = CONFIG_PATH, "No configuration file, using defaults");
                Ok(AppConfig::default())
            }
        }
    }
}

/// Parse configuration text. `${VAR}` placeholders in server entries are resolved.
pub fn parse_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let parse_error = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut document: Table = toml::from_str(content).map_err(parse_error)?;
    if let Some(servers) = document.remove("servers") {
        document.insert("servers".to_string(), substitute_env_vars(servers));
    }

    let parsed: RawConfig = Value::Table(document).try_into().map_err(parse_error)?;
    debug!(servers = parsed.servers.len(), "Parsed client configuration");

    Ok(AppConfig {
        llm: parsed.llm.unwrap_or_default(),
        servers: parsed.servers,
    })
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading client configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(text) => match shellexpand::tilde(text) {
            Cow::Borrowed(_) => path.to_path_buf(),
            Cow::Owned(expanded) => PathBuf::from(expanded),
        },
        None => path.to_path_buf(),
    }
}
