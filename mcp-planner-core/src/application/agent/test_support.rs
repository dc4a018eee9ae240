use crate::domain::tool::{ToolCatalog, ToolDescriptor, build_catalog};
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use crate::infrastructure::rpc::{McpTransport, RawResponse, RpcRequest, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Replays canned completions and records every request.
#[derive(Clone)]
pub(crate) struct ScriptedProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedProvider {
    pub(crate) fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.recordings.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .map(ModelResponse::new)
            .ok_or_else(|| ModelError::invalid_response("scripted", "no scripted response left"))
    }
}

pub(crate) fn catalog(tools: Value) -> ToolCatalog {
    let tools: Vec<ToolDescriptor> = serde_json::from_value(tools).expect("valid tool list");
    build_catalog(tools)
}

/// In-memory MCP endpoint: answers by method name and counts requests.
#[derive(Default)]
pub(crate) struct StubTransport {
    replies: std::sync::Mutex<Vec<(String, RawResponse)>>,
    requests: std::sync::Mutex<Vec<RpcRequest>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next request with `method`.
    pub(crate) fn reply(self, method: &str, response: RawResponse) -> Self {
        self.replies
            .lock()
            .expect("lock")
            .push((method.to_string(), response));
        self
    }

    pub(crate) fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().expect("lock").clone()
    }

    pub(crate) fn count(&self, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method == method)
            .count()
    }
}

#[async_trait]
impl McpTransport for StubTransport {
    fn endpoint(&self) -> &str {
        "stub://mcp"
    }

    async fn post(&self, request: &RpcRequest, _stream: bool) -> Result<RawResponse, TransportError> {
        self.requests.lock().expect("lock").push(request.clone());
        let mut replies = self.replies.lock().expect("lock");
        let position = replies
            .iter()
            .position(|(method, _)| *method == request.method)
            .unwrap_or_else(|| panic!("no reply queued for {}", request.method));
        Ok(replies.remove(position).1)
    }
}
