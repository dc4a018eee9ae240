//! Final answer synthesis from the executed plan.

use crate::constants::SYNTHESIS_TEMPERATURE;
use crate::domain::plan::{PlanStep, StepOutputs};
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest};
use crate::types::ChatMessage;
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, Span, info, info_span};

const SYSTEM_PROMPT: &str = "You are an assistant synthesizing answers from tool results.";

pub struct Synthesizer {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_tokens: u32,
    span: Span,
}

impl Synthesizer {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>, max_tokens: u32) -> Self {
        let model = model.into();
        let span = info_span!("synthesizer", provider = provider.id(), model = model.as_str());
        Self {
            provider,
            model,
            max_tokens,
            span,
        }
    }

    pub async fn synthesize(
        &self,
        query: &str,
        plan: &[PlanStep],
        outputs: &StepOutputs,
    ) -> Result<String, ModelError> {
        async {
            info!(steps = plan.len(), outputs = outputs.len(), "Synthesizing final answer");
            let request = ModelRequest::new(
                self.model.clone(),
                vec![
                    ChatMessage::system(SYSTEM_PROMPT),
                    ChatMessage::user(build_prompt(query, plan, outputs)),
                ],
            )
            .with_temperature(SYNTHESIS_TEMPERATURE)
            .with_max_tokens(self.max_tokens);

            let response = self.provider.chat(request).await?;
            Ok(response.content().trim().to_string())
        }
        .instrument(self.span.clone())
        .await
    }
}

/// Renders the question, the plan as `tool(k=v, ...)` lines and every raw step output.
pub fn build_prompt(query: &str, plan: &[PlanStep], outputs: &StepOutputs) -> String {
    let plan_lines = plan
        .iter()
        .map(render_call)
        .collect::<Vec<_>>()
        .join("\n");
    let result_lines = outputs
        .iter()
        .map(|(id, output)| format!("Step {id}: {output}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "User question:\n{query}\n\nPlan:\n{plan_lines}\n\nResults:\n{result_lines}\n\n\
         Provide a clear and concise answer using only the information above.\n"
    )
}

fn render_call(step: &PlanStep) -> String {
    let args = step
        .args
        .iter()
        .map(|(key, value)| match value {
            Value::String(text) => format!("{key}={text}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("- {}({args})", step.tool)
}
