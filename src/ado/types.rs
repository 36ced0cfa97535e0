//! Response envelopes shared by several Azure DevOps endpoints.
//!
//! Entity payloads are kept as raw JSON so that every field the server
//! returns reaches the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{count, value}` envelope used by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T = Value> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub value: Vec<T>,
}

/// Result of a WIQL query: references only, no field data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiqlResult {
    #[serde(default)]
    pub work_items: Vec<WorkItemReference>,
}

/// An `{id, url}` pointer to a work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemReference {
    pub id: u64,
    #[serde(default)]
    pub url: Option<String>,
}

impl WiqlResult {
    /// Ids of the matched work items, in query order, at most `limit`.
    pub fn ids(&self, limit: usize) -> Vec<u64> {
        self.work_items.iter().take(limit).map(|wi| wi.id).collect()
    }
}
