// Shared fixtures: an in-process MCP server and a scripted language model.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use mcp_planner_core::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

type Responder = Arc<dyn Fn(&Value) -> (u16, String) + Send + Sync>;

/// A request as seen by [`MockServer`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

impl Recorded {
    pub fn method(&self) -> &str {
        self.body["method"].as_str().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone)]
struct ServerState {
    responder: Responder,
    log: Arc<Mutex<Vec<Recorded>>>,
}

/// HTTP server on an ephemeral port that answers every POST through a closure.
pub struct MockServer {
    /// Scheme, host and port, without the route path.
    pub base: String,
    pub url: String,
    log: Arc<Mutex<Vec<Recorded>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start<F>(path: &str, responder: F) -> Self
    where
        F: Fn(&Value) -> (u16, String) + Send + Sync + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            responder: Arc::new(responder),
            log: log.clone(),
        };
        let app = Router::new().route(path, post(handle)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base: format!("http://{addr}"),
            url: format!("http://{addr}{path}"),
            log,
            handle,
        }
    }

    /// Answers MCP methods by name; `tools/call` goes to `on_call(name, arguments)`.
    pub async fn mcp<F>(tools: Value, on_call: F) -> Self
    where
        F: Fn(&str, &Value) -> (u16, String) + Send + Sync + 'static,
    {
        Self::start("/mcp", move |body| match body["method"].as_str() {
            Some("initialize") => (200, json!({"jsonrpc": "2.0", "id": body["id"], "result": {}}).to_string()),
            Some("tools/list") => (
                200,
                json!({"jsonrpc": "2.0", "id": body["id"], "result": {"tools": tools}}).to_string(),
            ),
            Some("tools/call") => {
                let name = body["params"]["name"].as_str().unwrap_or_default();
                on_call(name, &body["params"]["arguments"])
            }
            _ => (404, "unknown method".to_string()),
        })
        .await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().expect("request log").clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.method() == method)
            .count()
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.requests()
            .iter()
            .filter(|request| request.method() == "tools/call")
            .map(|request| {
                (
                    request.body["params"]["name"].as_str().unwrap_or_default().to_string(),
                    request.body["params"]["arguments"].clone(),
                )
            })
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle(State(state): State<ServerState>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.log.lock().expect("request log").push(Recorded {
        headers,
        body: body.clone(),
    });
    let (status, reply) = (state.responder)(&body);
    (StatusCode::from_u16(status).expect("valid status"), reply)
}

/// `tools/call` result envelope carrying one text block.
pub fn text_result(text: &str) -> (u16, String) {
    (
        200,
        json!({
            "jsonrpc": "2.0",
            "result": {"content": [{"type": "text", "text": text}], "isError": false}
        })
        .to_string(),
    )
}

/// Replays canned completions in order and records every request.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        let provider = Self::default();
        for reply in replies {
            provider.push(Ok(reply.to_string()));
        }
        provider
    }

    /// Queues a failure for the next call.
    pub fn failing_next(self, reason: &str) -> Self {
        self.push(Err(reason.to_string()));
        self
    }

    fn push(&self, reply: Result<String, String>) {
        self.replies.lock().expect("replies").push_back(reply);
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests").clone()
    }

    pub fn shared(&self) -> Option<Arc<dyn ModelProvider>> {
        Some(Arc::new(self.clone()))
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.requests.lock().expect("requests").push(request);
        match self.replies.lock().expect("replies").pop_front() {
            Some(Ok(content)) => Ok(ModelResponse::new(content)),
            Some(Err(reason)) => Err(ModelError::invalid_response("scripted", reason)),
            None => Err(ModelError::invalid_response("scripted", "no reply left")),
        }
    }
}
