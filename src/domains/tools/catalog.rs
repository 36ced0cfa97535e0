//! Tool catalog exchange.
//!
//! Tool listings from permissive producers do not always carry
//! `inputSchema.type`, or carry something other than `"object"`. Strict MCP
//! consumers reject those. [`normalize_input_schemas`] relabels every input
//! schema as an object schema and leaves everything else as it was. It does
//! not check that `properties`/`required` actually describe an object.

use rmcp::model::{JsonObject, Tool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only input schema kind strict consumers accept.
pub const OBJECT_KIND: &str = "object";

/// A tool declaration with a loosely typed input schema.
///
/// Keys this struct does not name are kept in `extra` and written back out
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclaration {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub input_schema: JsonObject,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<JsonObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<JsonObject>,

    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<JsonObject>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

impl ToolDeclaration {
    /// Declaration of a tool served by this process.
    pub fn from_tool(tool: &Tool) -> serde_json::Result<Self> {
        serde_json::from_value(serde_json::to_value(tool)?)
    }

    /// This declaration with `inputSchema.type` forced to `"object"`.
    pub fn normalized(mut self) -> Self {
        self.input_schema
            .insert("type".to_string(), Value::String(OBJECT_KIND.to_string()));
        self
    }
}

/// Force every declaration's input schema kind to `"object"`.
///
/// Order and length are preserved and the operation is idempotent.
pub fn normalize_input_schemas(tools: Vec<ToolDeclaration>) -> Vec<ToolDeclaration> {
    tools.into_iter().map(ToolDeclaration::normalized).collect()
}

/// One page of a `tools/list` result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolListing {
    #[serde(default)]
    pub tools: Vec<ToolDeclaration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl ToolListing {
    /// This page with every input schema normalized.
    pub fn normalized(self) -> Self {
        Self {
            tools: normalize_input_schemas(self.tools),
            next_cursor: self.next_cursor,
        }
    }
}
