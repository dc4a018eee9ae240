pub mod app;
pub mod env;
pub mod error;
pub mod llm;
pub mod loader;
pub mod server;

pub use crate::constants::CONFIG_PATH;
pub use app::AppConfig;
pub use error::ConfigError;
pub use llm::LlmConfig;
pub use server::ServerConfig;
