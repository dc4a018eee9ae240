// End-to-end inference tests: handshake, discovery, planning, execution and synthesis
// against an in-process MCP server and a scripted model.

#[path = "../common/mod.rs"]
mod common;

use common::{MockServer, ScriptedProvider, text_result};
use mcp_planner_core::agent::PlanError;
use mcp_planner_core::client::ClientConfig;
use mcp_planner_core::{LlmConfig, McpClient, McpError, ServerConfig, ServerOverrides, ServerRegistry};
use serde_json::{Map, Value, json};

fn weather_tools() -> Value {
    json!([
        {
            "name": "locate",
            "description": "Find the city for an IP address",
            "inputSchema": {"properties": {"ip": {"type": "string"}}, "required": ["ip"]}
        },
        {
            "name": "forecast",
            "description": "Weather forecast for a city",
            "inputSchema": {
                "properties": {"city": {"type": "string"}, "days": {"type": "integer"}},
                "required": ["city"]
            }
        },
        {
            "name": "notify",
            "description": "Send a notification",
            "inputSchema": {"properties": {"message": {"type": "string"}}}
        }
    ])
}

fn connect(server: &MockServer, provider: &ScriptedProvider) -> McpClient {
    connect_with(ServerConfig::new("weather", server.url.clone()), provider)
}

fn connect_with(config: ServerConfig, provider: &ScriptedProvider) -> McpClient {
    McpClient::connect(ClientConfig::new(config), provider.shared()).expect("client")
}

const TWO_STEP_PLAN: &str = r#"```json
[
  {"id": "step1", "tool": "locate", "args": {"ip": "10.1.2.3"}},
  {"id": "step2", "tool": "forecast", "args": {"city": "<output from step1>", "days": 2}}
]
```"#;

#[tokio::test]
async fn runs_plan_and_synthesizes_answer() {
    let server = MockServer::mcp(weather_tools(), |name, _| match name {
        "locate" => text_result(r#"{"city": "Oslo", "country": "NO"}"#),
        "forecast" => text_result("Rain expected in Oslo"),
        _ => (404, "unknown tool".to_string()),
    })
    .await;
    let provider = ScriptedProvider::new(vec![TWO_STEP_PLAN, "  It will rain in Oslo.  "]);
    let client = connect(&server, &provider);

    let outcome = client
        .run_agentic_inference("Will it rain where 10.1.2.3 is?", false)
        .await
        .expect("inference");

    assert_eq!(outcome.answer, "It will rain in Oslo.");
    assert_eq!(outcome.reasoning_steps.len(), 2);
    assert_eq!(outcome.reasoning_steps[1].args["city"], "Oslo");
    assert_eq!(outcome.reasoning_steps[1].response, "Rain expected in Oslo");
    assert!(outcome.reasoning_steps.iter().all(|step| step.error.is_none()));

    let calls = server.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], ("forecast".to_string(), json!({"city": "Oslo", "days": 2})));
    assert_eq!(server.count("initialize"), 1);

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].temperature, Some(0.0));
    assert_eq!(requests[1].temperature, Some(0.3));
    assert_eq!(requests[1].max_tokens, Some(800));
    let synthesis_prompt = &requests[1].messages.last().expect("user message").content;
    assert!(synthesis_prompt.contains("Will it rain where 10.1.2.3 is?"));
    assert!(synthesis_prompt.contains("- forecast(city=<output from step1>, days=2)"));
    assert!(synthesis_prompt.contains("Step step2: Rain expected in Oslo"));
}

#[tokio::test]
async fn failing_step_stops_the_plan() {
    let server = MockServer::mcp(weather_tools(), |name, _| match name {
        "locate" => text_result("Oslo"),
        "forecast" => (500, "forecast backend down".to_string()),
        _ => text_result("sent"),
    })
    .await;
    let plan = r#"[
        {"id": "step1", "tool": "locate", "args": {"ip": "10.1.2.3"}},
        {"id": "step2", "tool": "forecast", "args": {"city": "<output from step1>"}},
        {"id": "step3", "tool": "notify", "args": {"message": "<output from step2>"}}
    ]"#;
    let provider = ScriptedProvider::new(vec![plan, "never used"]);
    let client = connect(&server, &provider);

    let outcome = client
        .run_agentic_inference("Tell me the forecast", false)
        .await
        .expect("partial outcome");

    assert_eq!(outcome.answer, "[Tool call failed: forecast]");
    assert_eq!(outcome.reasoning_steps.len(), 2);
    assert_eq!(outcome.reasoning_steps[0].response, "Oslo");
    let failed = &outcome.reasoning_steps[1];
    assert_eq!(failed.tool, "forecast");
    assert_eq!(failed.response, "");
    assert!(failed.error.as_deref().is_some_and(|error| error.contains("500")));

    let called: Vec<String> = server.calls().into_iter().map(|(name, _)| name).collect();
    assert_eq!(called, vec!["locate", "forecast"]);
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn missing_reference_is_a_step_failure() {
    let server = MockServer::mcp(weather_tools(), |_, _| text_result("unused")).await;
    let plan = r#"[{"id": "step1", "tool": "forecast", "args": {"city": "<output from step0>"}}]"#;
    let provider = ScriptedProvider::new(vec![plan]);
    let client = connect(&server, &provider);

    let outcome = client
        .run_agentic_inference("Forecast?", false)
        .await
        .expect("partial outcome");

    assert_eq!(outcome.answer, "[Tool call failed: forecast]");
    assert_eq!(outcome.reasoning_steps.len(), 1);
    assert!(
        outcome.reasoning_steps[0]
            .error
            .as_deref()
            .is_some_and(|error| error.contains("step0"))
    );
    assert!(server.calls().is_empty());
}

#[tokio::test]
async fn synthesis_failure_keeps_the_trace() {
    let server = MockServer::mcp(weather_tools(), |_, _| text_result("Sunny")).await;
    let plan = r#"[{"id": "s1", "tool": "forecast", "args": {"city": "Rome"}}]"#;
    let provider = ScriptedProvider::new(vec![plan]).failing_next("model overloaded");
    let client = connect(&server, &provider);

    let outcome = client
        .run_agentic_inference("Weather in Rome?", false)
        .await
        .expect("outcome");

    assert!(outcome.answer.starts_with("[Synthesis failed: "));
    assert!(outcome.answer.contains("model overloaded"));
    assert_eq!(outcome.reasoning_steps.len(), 1);
    assert_eq!(outcome.reasoning_steps[0].response, "Sunny");
}

#[tokio::test]
async fn error_flagged_tool_result_is_not_fatal() {
    let server = MockServer::mcp(weather_tools(), |name, _| match name {
        "forecast" => (
            200,
            json!({"result": {"content": [{"type": "text", "text": "unknown city"}], "isError": true}})
                .to_string(),
        ),
        _ => text_result("sent"),
    })
    .await;
    let plan = r#"[
        {"id": "a", "tool": "forecast", "args": {"city": "Atlantis"}},
        {"id": "b", "tool": "notify", "args": {"message": "<output from a>"}}
    ]"#;
    let provider = ScriptedProvider::new(vec![plan, "The city is unknown."]);
    let client = connect(&server, &provider);

    let outcome = client
        .run_agentic_inference("Forecast for Atlantis", false)
        .await
        .expect("outcome");

    assert_eq!(outcome.answer, "The city is unknown.");
    assert_eq!(server.calls()[1].1, json!({"message": "unknown city"}));
}

#[tokio::test]
async fn unparsable_plan_is_an_error() {
    let server = MockServer::mcp(weather_tools(), |_, _| text_result("unused")).await;
    let provider = ScriptedProvider::new(vec!["I would call the forecast tool."]);
    let client = connect(&server, &provider);

    let err = client
        .run_agentic_inference("Forecast?", false)
        .await
        .expect_err("plan is not JSON");

    match err {
        McpError::Plan(PlanError::Parse { content, .. }) => {
            assert_eq!(content, "I would call the forecast tool.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(server.calls().is_empty());
}

#[tokio::test]
async fn list_tools_hits_the_network_once() {
    let server = MockServer::mcp(weather_tools(), |_, _| text_result("unused")).await;
    let client = connect(&server, &ScriptedProvider::default());

    let first = client.list_tools().await.expect("tools");
    let second = client.list_tools().await.expect("cached tools");

    assert_eq!(first, second);
    assert_eq!(
        first.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["forecast", "locate", "notify"]
    );
    assert_eq!(server.count("tools/list"), 1);
}

#[tokio::test]
async fn sse_tool_listing_with_no_tools() {
    let server = MockServer::start("/mcp", |_| {
        (200, "data: {\"result\": {\"tools\": []}}".to_string())
    })
    .await;
    let client = connect(&server, &ScriptedProvider::default());

    let tools = client.list_tools().await.expect("tools");
    assert!(tools.is_empty());
}

#[tokio::test]
async fn duplicate_tool_names_keep_the_last_descriptor() {
    let tools = json!([
        {"name": "forecast", "description": "old"},
        {"name": "forecast", "description": "new"}
    ]);
    let server = MockServer::mcp(tools, |_, _| text_result("unused")).await;
    let client = connect(&server, &ScriptedProvider::default());

    let catalog = client.list_tools().await.expect("tools");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog["forecast"].description, "new");
}

#[tokio::test]
async fn handshake_failure_is_fatal() {
    let server = MockServer::start("/mcp", |_| (401, "unauthorized".to_string())).await;
    let provider = ScriptedProvider::new(vec![TWO_STEP_PLAN]);
    let client = connect(&server, &provider);

    let err = client
        .run_agentic_inference("Forecast?", false)
        .await
        .expect_err("handshake rejected");

    assert!(matches!(err, McpError::Initialize(_)));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn server_params_and_headers_reach_the_server() {
    let server = MockServer::mcp(weather_tools(), |_, _| text_result("12C")).await;
    let mut params = Map::new();
    params.insert("units".to_string(), json!("metric"));
    params.insert("days".to_string(), json!(7));
    let config = ServerConfig::new("weather", server.url.clone())
        .with_header("Authorization", "Bearer weather-token")
        .with_params(params);
    let plan = r#"[{"id": "s1", "tool": "forecast", "args": {"city": "Oslo", "days": 1}}]"#;
    let provider = ScriptedProvider::new(vec![plan, "12C in Oslo"]);
    let client = connect_with(config, &provider);

    assert_eq!(client.api_key(), "weather-token");
    client
        .run_agentic_inference("Temperature in Oslo?", true)
        .await
        .expect("outcome");

    assert_eq!(
        server.calls()[0].1,
        json!({"city": "Oslo", "days": 1, "units": "metric"})
    );
    assert!(
        server
            .requests()
            .iter()
            .all(|request| request.header("authorization") == Some("Bearer weather-token"))
    );
}

#[tokio::test]
async fn override_header_is_the_one_sent() {
    let server = MockServer::mcp(weather_tools(), |_, _| text_result("unused")).await;
    let registry = ServerRegistry::new(vec![
        ServerConfig::new("weather", server.url.clone())
            .with_header("authorization", "Bearer from-config"),
    ]);
    let overrides = ServerOverrides::default().with_header("Authorization", "Bearer from-cli");
    let client = registry
        .client(
            "weather",
            &overrides,
            &LlmConfig::default(),
            ScriptedProvider::default().shared(),
        )
        .expect("client");

    assert_eq!(client.api_key(), "from-cli");
    client.list_tools().await.expect("tools");

    let requests = server.requests();
    assert!(!requests.is_empty());
    for request in &requests {
        let sent: Vec<_> = request.headers.get_all("authorization").iter().collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_str().ok(), Some("Bearer from-cli"));
    }
}

#[test]
fn construction_without_model_is_rejected() {
    let result = McpClient::connect(
        ClientConfig::new(ServerConfig::new("weather", "http://127.0.0.1:1/mcp")),
        None,
    );
    assert!(matches!(result, Err(McpError::PlannerUnavailable)));
}
