//! # Agent Module
//!
//! Plan-then-execute loop over the tools of one MCP server.
//!
//! ## Key Types
//!
//! - [`Planner`] - asks the model for an ordered plan of tool calls
//! - [`StepReference`] - the `<output from ID>` placeholder convention
//! - [`execute_plan`] - runs a plan step by step through a [`ToolInvoker`]
//! - [`Synthesizer`] - turns collected outputs into the final answer
//!
//! ## Agent Loop
//!
//! 1. Build a planning prompt from the tool catalogue and ask for a JSON plan
//! 2. For each step, substitute references to earlier outputs into its arguments
//! 3. Invoke the tool; the first failing step ends the run with a partial result
//! 4. Send the question, plan and outputs back to the model for a final answer

mod errors;
pub mod executor;
pub mod planner;
pub mod resolver;
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{PlanError, ResolveError, StepFailure, ToolInvocationError};
pub use executor::{ExecutionOutcome, ToolInvoker, execute_plan};
pub use planner::Planner;
pub use resolver::{StepReference, resolve};
pub use synthesizer::Synthesizer;
