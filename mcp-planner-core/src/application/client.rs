use super::agent::{
    ExecutionOutcome, PlanError, Planner, Synthesizer, ToolInvoker, execute_plan,
};
use crate::config::{ConfigError, LlmConfig, ServerConfig};
use crate::constants::{
    CLIENT_NAME, CLIENT_VERSION, DEFAULT_MODEL, PROTOCOL_VERSION, SYNTHESIS_MAX_TOKENS,
};
use crate::domain::plan::InferenceOutcome;
use crate::domain::tool::{ToolCatalog, ToolDescriptor, ToolResponse, build_catalog};
use crate::infrastructure::model::ModelProvider;
use crate::infrastructure::rpc::types::{METHOD_INITIALIZE, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST};
use crate::infrastructure::rpc::{
    HttpTransport, McpTransport, RpcRequest, TransportError, parse_mcp_response,
};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub planner_model: String,
    pub synthesis_model: String,
    pub synthesis_max_tokens: u32,
}

impl ClientConfig {
    pub fn new(server: ServerConfig) -> Self {
        Self {
            server,
            planner_model: DEFAULT_MODEL.to_string(),
            synthesis_model: DEFAULT_MODEL.to_string(),
            synthesis_max_tokens: SYNTHESIS_MAX_TOKENS,
        }
    }

    /// Takes model names and the output bound from `[llm]`.
    pub fn from_llm(server: ServerConfig, llm: &LlmConfig) -> Self {
        Self::new(server)
            .with_planner_model(llm.planner_model.clone())
            .with_synthesis_model(llm.synthesis_model.clone())
            .with_synthesis_max_tokens(llm.synthesis_max_tokens)
    }

    pub fn with_planner_model(mut self, model: impl Into<String>) -> Self {
        self.planner_model = model.into();
        self
    }

    pub fn with_synthesis_model(mut self, model: impl Into<String>) -> Self {
        self.synthesis_model = model.into();
        self
    }

    pub fn with_synthesis_max_tokens(mut self, max_tokens: u32) -> Self {
        self.synthesis_max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Error)]
pub enum McpError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("MCP initialization failed: {0}")]
    Initialize(#[source] TransportError),
    #[error("listing MCP tools failed: {0}")]
    ListTools(#[source] TransportError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("no language model client is configured")]
    PlannerUnavailable,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl McpError {
    pub fn user_message(&self) -> String {
        match self {
            McpError::Config(err) => err.user_message(),
            McpError::Initialize(err) => {
                format!("Could not initialize the MCP session. {}", err.user_message())
            }
            McpError::ListTools(err) => {
                format!("Could not list MCP tools. {}", err.user_message())
            }
            McpError::Plan(err) => err.user_message(),
            McpError::PlannerUnavailable => {
                "No language model is available. Set the API key variable named in [llm]."
                    .to_string()
            }
            McpError::Transport(err) => err.user_message(),
        }
    }
}

/// Client for one MCP server, with planning and synthesis on top.
pub struct McpClient {
    config: ClientConfig,
    api_key: String,
    transport: Arc<dyn McpTransport>,
    planner: Planner,
    synthesizer: Synthesizer,
    tool_cache: Mutex<Option<ToolCatalog>>,
    span: Span,
}

impl McpClient {
    /// Fails with [`McpError::PlannerUnavailable`] when `provider` is `None`.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn McpTransport>,
        provider: Option<Arc<dyn ModelProvider>>,
    ) -> Result<Self, McpError> {
        let provider = provider.ok_or(McpError::PlannerUnavailable)?;
        let planner = Planner::new(provider.clone(), config.planner_model.clone());
        let synthesizer = Synthesizer::new(
            provider,
            config.synthesis_model.clone(),
            config.synthesis_max_tokens,
        );
        let span = info_span!(
            "mcp_client",
            server = config.server.id.as_str(),
            endpoint = transport.endpoint()
        );
        Ok(Self {
            api_key: config.server.bearer_token(),
            config,
            transport,
            planner,
            synthesizer,
            tool_cache: Mutex::new(None),
            span,
        })
    }

    /// Builds an HTTP transport from the server's url and headers.
    pub fn connect(
        config: ClientConfig,
        provider: Option<Arc<dyn ModelProvider>>,
    ) -> Result<Self, McpError> {
        let url = config
            .server
            .url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingUrl {
                id: config.server.id.clone(),
            })?;
        let transport = HttpTransport::new(url, &config.server.headers)?;
        Self::new(config, Arc::new(transport), provider)
    }

    pub fn server_id(&self) -> &str {
        &self.config.server.id
    }

    /// Bearer token derived from the `Authorization` header.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.config.server.metadata
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends the `initialize` handshake. Only the status is checked.
    pub async fn initialize(&self) -> Result<(), McpError> {
        let request = RpcRequest::new(
            METHOD_INITIALIZE,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": CLIENT_NAME, "version": CLIENT_VERSION},
            }),
        );
        let result = async {
            let response = self.transport.post(&request, false).await?;
            response.ensure_ok()
        }
        .instrument(self.span.clone())
        .await;

        match result {
            Ok(_) => {
                self.span.in_scope(|| debug!("MCP session initialized"));
                Ok(())
            }
            Err(err) => {
                self.span
                    .in_scope(|| error!(status = err.status(), error = %err, "Failed to initialize MCP"));
                Err(McpError::Initialize(err))
            }
        }
    }

    /// Tools exposed by the server, fetched once and cached for the client's lifetime.
    pub async fn list_tools(&self) -> Result<ToolCatalog, McpError> {
        let mut cache = self.tool_cache.lock().await;
        if let Some(tools) = cache.as_ref() {
            return Ok(tools.clone());
        }

        let tools = self
            .fetch_tools()
            .instrument(self.span.clone())
            .await
            .map_err(McpError::ListTools)?;
        self.span
            .in_scope(|| info!(count = tools.len(), "Discovered MCP tools"));
        *cache = Some(tools.clone());
        Ok(tools)
    }

    async fn fetch_tools(&self) -> Result<ToolCatalog, TransportError> {
        let request = RpcRequest::new(METHOD_TOOLS_LIST, json!({}));
        let response = self.transport.post(&request, false).await?.ensure_ok()?;
        let mut envelope = parse_mcp_response(&response.body)?;

        let tools = envelope
            .get_mut("result")
            .and_then(|result| result.get_mut("tools"))
            .map(Value::take)
            .ok_or_else(|| TransportError::MissingField {
                field: "result.tools",
                body: response.body.clone(),
            })?;
        let tools: Vec<ToolDescriptor> =
            serde_json::from_value(tools).map_err(|source| TransportError::Parse {
                body: response.body.clone(),
                source,
            })?;
        Ok(build_catalog(tools))
    }

    /// Calls `tool` with the server's default params underneath `args`.
    pub async fn call_tool(
        &self,
        tool: &str,
        args: Map<String, Value>,
        stream: bool,
    ) -> Result<ToolResponse, TransportError> {
        let mut arguments = self.config.server.params.clone();
        arguments.extend(args);

        let request = RpcRequest::new(
            METHOD_TOOLS_CALL,
            json!({"name": tool, "arguments": arguments}),
        );
        let response = self
            .transport
            .post(&request, stream)
            .instrument(self.span.clone())
            .await?
            .ensure_ok()?;
        let envelope = parse_mcp_response(&response.body)?;
        Ok(ToolResponse::from_envelope(envelope))
    }

    /// Plans, executes and synthesizes an answer for `query`.
    ///
    /// Handshake, discovery and planning failures are returned as errors. A failing
    /// step or a failed synthesis still yields an outcome whose answer is a marker.
    pub async fn run_agentic_inference(
        &self,
        query: &str,
        stream: bool,
    ) -> Result<InferenceOutcome, McpError> {
        self.initialize().await?;
        let tools = self.list_tools().await?;
        let plan = self.planner.plan(query, &tools).await?;
        self.span
            .in_scope(|| info!(steps = plan.len(), "Executing tool plan"));

        let (outputs, trace) = match execute_plan(self, &plan, stream).await {
            ExecutionOutcome::Completed { outputs, trace } => (outputs, trace),
            ExecutionOutcome::Aborted { failure, trace } => {
                self.span.in_scope(|| {
                    warn!(
                        step_id = failure.step.as_str(),
                        tool = failure.tool.as_str(),
                        "Plan aborted"
                    )
                });
                return Ok(InferenceOutcome {
                    answer: format!("[Tool call failed: {}]", failure.tool),
                    reasoning_steps: trace,
                });
            }
        };

        let answer = match self.synthesizer.synthesize(query, &plan, &outputs).await {
            Ok(answer) => answer,
            Err(err) => {
                self.span
                    .in_scope(|| error!(error = %err, "Synthesis failed"));
                format!("[Synthesis failed: {err}]")
            }
        };

        Ok(InferenceOutcome {
            answer,
            reasoning_steps: trace,
        })
    }
}

#[async_trait]
impl ToolInvoker for McpClient {
    async fn call_tool(
        &self,
        tool: &str,
        args: Map<String, Value>,
        stream: bool,
    ) -> Result<ToolResponse, TransportError> {
        McpClient::call_tool(self, tool, args, stream).await
    }
}
