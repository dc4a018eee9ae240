use crate::infrastructure::model::ModelError;
use crate::infrastructure::rpc::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("failed to parse tool plan JSON: {source}\nRaw content: {content}")]
    Parse {
        content: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PlanError {
    pub fn user_message(&self) -> String {
        match self {
            PlanError::Model(err) => err.user_message(),
            PlanError::Parse { .. } => {
                "The model returned a plan that is not valid JSON. Try rephrasing the query."
                    .to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("referenced step id '{step}' not found in previous outputs")]
    ReferenceNotFound { step: String },
}

/// Why a single plan step could not run.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error(transparent)]
    Reference(#[from] ResolveError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
#[error("step '{step}' failed calling tool '{tool}': {source}")]
pub struct ToolInvocationError {
    pub step: String,
    pub tool: String,
    #[source]
    pub source: StepFailure,
}

impl ToolInvocationError {
    pub fn new(step: impl Into<String>, tool: impl Into<String>, source: impl Into<StepFailure>) -> Self {
        Self {
            step: step.into(),
            tool: tool.into(),
            source: source.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match &self.source {
            StepFailure::Reference(err) => {
                format!("Tool \"{}\" could not run: {err}.", self.tool)
            }
            StepFailure::Transport(err) => {
                format!("Tool \"{}\" failed: {}", self.tool, err.user_message())
            }
        }
    }
}
