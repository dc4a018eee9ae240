//! Model infrastructure module
//!
//! Language model access behind a single trait so planning and synthesis can
//! run against any backend, including scripted ones in tests.
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - ModelProvider trait
//! - `adapter` - Message format adapters
//! - `factory` - Builds a provider from `[llm]` settings
//! - `clients` - Individual client implementations

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use factory::ProviderFactory;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelRequest, ModelResponse};
