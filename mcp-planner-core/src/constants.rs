//! Application constants
//!
//! Single source of truth for paths, model defaults and wire constants.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/client.toml";

/// Default environment file path
pub const ENV_PATH: &str = ".env";

/// Protocol version announced during the `initialize` handshake
pub const PROTOCOL_VERSION: &str = "1.0";

/// Client name announced during the `initialize` handshake
pub const CLIENT_NAME: &str = "mcp-client";

/// Client version announced during the `initialize` handshake
pub const CLIENT_VERSION: &str = "1.0";

/// Model used for planning and synthesis unless configured otherwise
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible endpoint
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";

/// Default environment variable holding the LLM API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Planning must be deterministic
pub const PLANNER_TEMPERATURE: f32 = 0.0;

pub const SYNTHESIS_TEMPERATURE: f32 = 0.3;

pub const SYNTHESIS_MAX_TOKENS: u32 = 800;

/// Maximum number of characters of a tool response kept in the reasoning trace
pub const TRACE_RESPONSE_LIMIT: usize = 300;
