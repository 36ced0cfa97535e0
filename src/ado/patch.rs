//! JSON Patch documents for partial work item updates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a single patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
    Test,
}

/// One `{op, path, value}` entry of a JSON Patch document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: Value,
}

impl PatchOperation {
    pub fn new(op: PatchOp, path: impl Into<String>, value: Value) -> Self {
        Self {
            op,
            path: path.into(),
            value,
        }
    }

    /// `add` on the work item field with the given reference name.
    pub fn add_field(field: &str, value: impl Into<Value>) -> Self {
        Self::new(PatchOp::Add, field_path(field), value.into())
    }

    /// `replace` on the work item field with the given reference name.
    pub fn replace_field(field: &str, value: impl Into<Value>) -> Self {
        Self::new(PatchOp::Replace, field_path(field), value.into())
    }
}

/// Patch path of a work item field, e.g. `/fields/System.Title`.
pub fn field_path(field: &str) -> String {
    format!("/fields/{field}")
}
