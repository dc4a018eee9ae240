//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;

/// A chat completion capability: messages and sampling parameters in, text out.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Identifier used in logs and errors
    fn id(&self) -> &str;

    /// Send a chat request to the model provider
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
