//! Plan construction: the model decomposes a query into ordered tool calls.

use super::errors::PlanError;
use super::resolver::StepReference;
use crate::constants::PLANNER_TEMPERATURE;
use crate::domain::plan::PlanStep;
use crate::domain::tool::ToolCatalog;
use crate::infrastructure::model::{ModelProvider, ModelRequest};
use crate::types::ChatMessage;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

pub struct Planner {
    provider: Arc<dyn ModelProvider>,
    model: String,
    span: Span,
}

impl Planner {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        let model = model.into();
        let span = info_span!("planner", provider = provider.id(), model = model.as_str());
        Self {
            provider,
            model,
            span,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Asks the model for a plan. Malformed output is a hard failure; there is no re-prompting.
    pub async fn plan(&self, query: &str, tools: &ToolCatalog) -> Result<Vec<PlanStep>, PlanError> {
        async {
            let prompt = build_prompt(query, tools);
            info!(tools = tools.len(), "Sending tool planning prompt");
            debug!(%prompt, "Planning prompt");

            let request = ModelRequest::new(self.model.clone(), vec![ChatMessage::user(prompt)])
                .with_temperature(PLANNER_TEMPERATURE);
            let response = self.provider.chat(request).await?;

            let plan = parse_plan(response.content()).inspect_err(|err| {
                error!(error = %err, "Failed to parse tool plan JSON");
            })?;

            for step in &plan {
                if !tools.contains_key(&step.tool) {
                    warn!(step_id = step.id.as_str(), tool = step.tool.as_str(), "Plan references an unknown tool");
                }
            }
            info!(steps = plan.len(), "Plan received");
            Ok(plan)
        }
        .instrument(self.span.clone())
        .await
    }
}

/// Renders the planning prompt for `query` over the tool catalogue.
pub fn build_prompt(query: &str, tools: &ToolCatalog) -> String {
    let mut descriptions = String::new();
    let mut shapes = Vec::with_capacity(tools.len());

    for tool in tools.values() {
        let _ = writeln!(descriptions, "- {}:", tool.name);
        let _ = writeln!(descriptions, "    Description: {}", tool.description);
        let _ = writeln!(descriptions, "    Arguments:");

        let mut arg_shapes = Vec::new();
        for arg in tool.input_schema.arguments() {
            let requirement = if arg.required { "required" } else { "optional" };
            let _ = writeln!(descriptions, "      - {} ({}, {requirement})", arg.name, arg.arg_type);
            arg_shapes.push(format!("\"{}\": <{}>", arg.name, arg.arg_type));
        }
        shapes.push(format!(
            "{{\"tool\": \"{}\", \"args\": {{{}}}}}",
            tool.name,
            arg_shapes.join(", ")
        ));
    }

    let reference = StepReference::placeholder("step1");
    format!(
        r#"You are an agent with access to the following tools:
{descriptions}
Call shapes:
[
  {shapes}
]

Given the user query: "{query}"

Decompose the task into a sequence of tool calls, specifying the tool name and arguments for each step.

Instructions:
- For each tool call, include a unique 'id' field (e.g., 'step1', 'step2', ...).
- Specify the 'tool' to use and an 'args' object for its arguments.
- If a tool call depends on the output of a previous step, use '<output from STEP_ID>' as the value of the relevant argument.
- Return a flat JSON array. Only output valid JSON.

Example:
[
  {{"id": "step1", "tool": "tool-a", "args": {{"arg1": "value"}}}},
  {{"id": "step2", "tool": "tool-b", "args": {{"arg2": "{reference}"}}}}
]
"#,
        shapes = shapes.join(",\n  "),
    )
}

/// Removes a Markdown code fence wrapped around the model output.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = trimmed
        .split_once('\n')
        .map_or(trimmed, |(_, rest)| rest);
    match body.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => body,
    }
}

/// Parses model output into plan steps. Anything but an array of `{id, tool, args}` objects is rejected.
pub fn parse_plan(content: &str) -> Result<Vec<PlanStep>, PlanError> {
    let body = strip_code_fence(content);
    serde_json::from_str(body).map_err(|source| PlanError::Parse {
        content: body.to_string(),
        source,
    })
}
