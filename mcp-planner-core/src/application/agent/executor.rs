//! Sequential plan execution.

use super::errors::{StepFailure, ToolInvocationError};
use super::resolver::resolve;
use crate::domain::plan::{PlanStep, ReasoningStep, StepOutputs};
use crate::domain::tool::ToolResponse;
use crate::infrastructure::rpc::TransportError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{Instrument, error, info, info_span, warn};

/// Invokes a tool by name on the connected server.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn call_tool(
        &self,
        tool: &str,
        args: Map<String, Value>,
        stream: bool,
    ) -> Result<ToolResponse, TransportError>;
}

/// Result of walking a plan.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// Every step ran.
    Completed {
        outputs: StepOutputs,
        trace: Vec<ReasoningStep>,
    },
    /// A step failed; later steps did not run. The trace ends with the failed step.
    Aborted {
        failure: ToolInvocationError,
        trace: Vec<ReasoningStep>,
    },
}

impl ExecutionOutcome {
    pub fn trace(&self) -> &[ReasoningStep] {
        match self {
            ExecutionOutcome::Completed { trace, .. } | ExecutionOutcome::Aborted { trace, .. } => {
                trace
            }
        }
    }
}

/// Runs `plan` in order, one step at a time.
///
/// References are resolved against the outputs of steps that already ran. A tool
/// response flagged `isError` is logged and its text is kept like any other output.
pub async fn execute_plan<T>(invoker: &T, plan: &[PlanStep], stream: bool) -> ExecutionOutcome
where
    T: ToolInvoker + ?Sized,
{
    let mut outputs = StepOutputs::new();
    let mut trace = Vec::with_capacity(plan.len());

    for step in plan {
        let span = info_span!("step", step_id = step.id.as_str(), tool = step.tool.as_str());
        let result = run_step(invoker, step, &outputs, stream)
            .instrument(span)
            .await;

        match result {
            Ok((args, response)) => {
                let output = response.text();
                trace.push(ReasoningStep::succeeded(step, args, output));
                outputs.insert(step.id.clone(), output);
            }
            Err((args, failure)) => {
                error!(
                    step_id = step.id.as_str(),
                    tool = step.tool.as_str(),
                    error = %failure,
                    "Tool call failed"
                );
                trace.push(ReasoningStep::failed(step, args, failure.to_string()));
                return ExecutionOutcome::Aborted {
                    failure: ToolInvocationError::new(&step.id, &step.tool, failure),
                    trace,
                };
            }
        }
    }

    ExecutionOutcome::Completed { outputs, trace }
}

type StepResult = Result<(Map<String, Value>, ToolResponse), (Map<String, Value>, StepFailure)>;

async fn run_step<T>(invoker: &T, step: &PlanStep, outputs: &StepOutputs, stream: bool) -> StepResult
where
    T: ToolInvoker + ?Sized,
{
    let args = match resolve(&step.args, outputs) {
        Ok(args) => args,
        Err(err) => return Err((step.args.clone(), err.into())),
    };

    let shown = Value::Object(args.clone());
    info!(args = %shown, "Calling tool");
    match invoker.call_tool(&step.tool, args.clone(), stream).await {
        Ok(response) => {
            if response.is_error() {
                warn!(text = response.text(), "Tool reported isError; continuing");
            }
            if let Some(message) = response.rpc_error() {
                warn!(rpc_error = message, "Tool call returned a JSON-RPC error object");
            }
            Ok((args, response))
        }
        Err(err) => Err((args, err.into())),
    }
}
