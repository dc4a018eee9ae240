//! Substitution of `<output from STEP_ID>` placeholders in step arguments.

use super::errors::ResolveError;
use crate::domain::plan::StepOutputs;
use serde_json::{Map, Value};

/// A placeholder pointing at the output of an earlier step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReference<'a> {
    pub step_id: &'a str,
}

impl<'a> StepReference<'a> {
    const PREFIX: &'static str = "<output from ";
    const SUFFIX: &'static str = ">";

    /// Recognizes a string value of the form `<output from ID>`.
    pub fn parse(value: &'a Value) -> Option<Self> {
        let text = value.as_str()?;
        let inner = text
            .strip_prefix(Self::PREFIX)?
            .strip_suffix(Self::SUFFIX)?;
        Some(Self {
            step_id: inner.trim(),
        })
    }

    /// The placeholder text for `step_id`, as the planner is told to write it.
    pub fn placeholder(step_id: &str) -> String {
        format!("{}{step_id}{}", Self::PREFIX, Self::SUFFIX)
    }
}

/// Returns a copy of `args` with every reference replaced by the decoded output it names.
pub fn resolve(
    args: &Map<String, Value>,
    outputs: &StepOutputs,
) -> Result<Map<String, Value>, ResolveError> {
    args.iter()
        .map(|(name, value)| -> Result<(String, Value), ResolveError> {
            let resolved = match StepReference::parse(value) {
                Some(reference) => {
                    let output = outputs.get(reference.step_id).ok_or_else(|| {
                        ResolveError::ReferenceNotFound {
                            step: reference.step_id.to_string(),
                        }
                    })?;
                    decode_output(name, output)
                }
                None => value.clone(),
            };
            Ok((name.clone(), resolved))
        })
        .collect()
}

/// Picks the value for argument `name` out of a step's textual output.
///
/// JSON objects yield the field named like the argument, or their only field;
/// any other JSON is used whole; non-JSON text is used verbatim.
fn decode_output(name: &str, output: &str) -> Value {
    match serde_json::from_str::<Value>(output) {
        Ok(Value::Object(mut map)) => {
            if let Some(value) = map.remove(name) {
                value
            } else if map.len() == 1 {
                map.into_iter()
                    .next()
                    .map(|(_, value)| value)
                    .unwrap_or(Value::Null)
            } else {
                Value::Object(map)
            }
        }
        Ok(parsed) => parsed,
        Err(_) => Value::String(output.to_string()),
    }
}
