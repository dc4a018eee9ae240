//! Tool catalogue and tool call results as exposed by an MCP server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Tools discovered on a server, keyed by tool name.
pub type ToolCatalog = BTreeMap<String, ToolDescriptor>;

/// Server-provided description of a callable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema", default)]
    pub input_schema: InputSchema,
}

/// JSON schema fragment describing the arguments of a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub required: Vec<String>,
}

/// One argument of a tool as rendered in planning prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec<'a> {
    pub name: &'a str,
    pub arg_type: &'a str,
    pub required: bool,
}

impl InputSchema {
    /// Arguments in schema order; a property without `type` is reported as `string`.
    pub fn arguments(&self) -> impl Iterator<Item = ArgumentSpec<'_>> {
        self.properties.iter().map(|(name, spec)| ArgumentSpec {
            name: name.as_str(),
            arg_type: spec.get("type").and_then(Value::as_str).unwrap_or("string"),
            required: self.required.iter().any(|required| required == name),
        })
    }
}

/// Builds the name-keyed catalogue. A later descriptor replaces an earlier one with the same name.
pub fn build_catalog(tools: Vec<ToolDescriptor>) -> ToolCatalog {
    let mut catalog = ToolCatalog::new();
    for tool in tools {
        catalog.insert(tool.name.clone(), tool);
    }
    catalog
}

/// Raw JSON-RPC envelope returned by `tools/call`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    raw: Value,
}

impl ToolResponse {
    pub fn from_envelope(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The `result` object, if the envelope carried one.
    pub fn result(&self) -> Option<&Map<String, Value>> {
        self.raw.get("result").and_then(Value::as_object)
    }

    /// Text of the first content block. Further blocks are not read.
    pub fn text(&self) -> &str {
        self.result()
            .and_then(|result| result.get("content"))
            .and_then(Value::as_array)
            .and_then(|content| content.first())
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn is_error(&self) -> bool {
        self.result()
            .and_then(|result| result.get("isError"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Message of a JSON-RPC level `error` object, when the server sent one.
    pub fn rpc_error(&self) -> Option<&str> {
        self.raw
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
    }
}
