//! Core of the MCP planning client.
//!
//! A query flows through four stages:
//! 1. discover the tools exposed by an MCP server (`tools/list`, cached)
//! 2. ask a language model for an ordered plan of tool calls
//! 3. execute the plan step by step, feeding earlier outputs into later arguments
//! 4. ask the language model to synthesize an answer from the collected outputs
//!
//! Logging goes through `tracing`; this crate never installs a subscriber.

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, client, registry};
pub use config::{AppConfig, ConfigError, LlmConfig, ServerConfig};
pub use domain::{plan, tool, types};
pub use infrastructure::{model, rpc};

pub use application::client::{McpClient, McpError};
pub use application::registry::{ServerOverrides, ServerRegistry};
pub use domain::plan::{InferenceOutcome, PlanStep, ReasoningStep, StepOutputs};
pub use domain::tool::{ToolCatalog, ToolDescriptor, ToolResponse};
