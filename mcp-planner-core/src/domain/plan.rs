//! Plans produced by the planner and the records produced while executing them.

use crate::constants::TRACE_RESPONSE_LIMIT;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tool invocation in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    pub tool: String,
    pub args: Map<String, Value>,
}

/// Textual tool outputs of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutputs {
    entries: Vec<(String, String)>,
}

impl StepOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an output. A repeated step id replaces the earlier value in place.
    pub fn insert(&mut self, step_id: impl Into<String>, output: impl Into<String>) {
        let step_id = step_id.into();
        let output = output.into();
        match self.entries.iter_mut().find(|(id, _)| *id == step_id) {
            Some(entry) => entry.1 = output,
            None => self.entries.push((step_id, output)),
        }
    }

    pub fn get(&self, step_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == step_id)
            .map(|(_, output)| output.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, output)| (id.as_str(), output.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StepOutputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut outputs = StepOutputs::new();
        for (id, output) in iter {
            outputs.insert(id, output);
        }
        outputs
    }
}

/// Trace record of an attempted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub id: String,
    pub tool: String,
    pub args: Map<String, Value>,
    /// Tool output cut to [`TRACE_RESPONSE_LIMIT`] characters.
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReasoningStep {
    pub fn succeeded(step: &PlanStep, args: Map<String, Value>, output: &str) -> Self {
        Self {
            id: step.id.clone(),
            tool: step.tool.clone(),
            args,
            response: truncate_chars(output, TRACE_RESPONSE_LIMIT),
            error: None,
        }
    }

    pub fn failed(step: &PlanStep, args: Map<String, Value>, error: impl Into<String>) -> Self {
        Self {
            id: step.id.clone(),
            tool: step.tool.clone(),
            args,
            response: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Final result of an agentic inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceOutcome {
    pub answer: String,
    pub reasoning_steps: Vec<ReasoningStep>,
}

/// Keeps at most `limit` characters (code points) of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
