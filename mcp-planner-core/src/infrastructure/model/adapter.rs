//! Message adapters - convert between different API formats

use crate::types::ChatMessage;
use serde_json::{Value, json};

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format
    /// Returns: [{"role": "...", "content": "..."}]
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.clone()
                })
            })
            .collect()
    }

    /// Ollama's chat endpoint takes the same message shape
    pub fn to_ollama_format(messages: &[ChatMessage]) -> Vec<Value> {
        Self::to_openai_format(messages)
    }
}
