//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Name-based dispatch for tool calls (used by the HTTP transport)
//! - Tool metadata for listing

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use tracing::warn;

use super::definitions::{
    AddWorkItemCommentTool, CreatePullRequestTool, CreateWorkItemTool, GetIterationWorkItemsTool,
    GetPipelineRunTool, GetPullRequestTool, GetWorkItemTool, ListBranchesTool, ListIterationsTool,
    ListPipelineRunsTool, ListPipelinesTool, ListProjectsTool, ListPullRequestsTool,
    ListRepositoriesTool, ListTeamMembersTool, ListWorkItemTypesTool, QueryWorkItemsTool,
    RunPipelineTool, UpdatePullRequestTool, UpdateWorkItemTool,
};
use super::error::ToolError;
use super::handlers::{AdoTool, invoke, to_tool};
use crate::ado::AdoClient;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    client: Arc<AdoClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<AdoClient>) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            QueryWorkItemsTool::NAME,
            GetWorkItemTool::NAME,
            CreateWorkItemTool::NAME,
            UpdateWorkItemTool::NAME,
            ListWorkItemTypesTool::NAME,
            AddWorkItemCommentTool::NAME,
            ListRepositoriesTool::NAME,
            ListPullRequestsTool::NAME,
            GetPullRequestTool::NAME,
            CreatePullRequestTool::NAME,
            UpdatePullRequestTool::NAME,
            ListBranchesTool::NAME,
            ListPipelinesTool::NAME,
            RunPipelineTool::NAME,
            GetPipelineRunTool::NAME,
            ListPipelineRunsTool::NAME,
            ListIterationsTool::NAME,
            GetIterationWorkItemsTool::NAME,
            ListTeamMembersTool::NAME,
            ListProjectsTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            to_tool::<QueryWorkItemsTool>(),
            to_tool::<GetWorkItemTool>(),
            to_tool::<CreateWorkItemTool>(),
            to_tool::<UpdateWorkItemTool>(),
            to_tool::<ListWorkItemTypesTool>(),
            to_tool::<AddWorkItemCommentTool>(),
            to_tool::<ListRepositoriesTool>(),
            to_tool::<ListPullRequestsTool>(),
            to_tool::<GetPullRequestTool>(),
            to_tool::<CreatePullRequestTool>(),
            to_tool::<UpdatePullRequestTool>(),
            to_tool::<ListBranchesTool>(),
            to_tool::<ListPipelinesTool>(),
            to_tool::<RunPipelineTool>(),
            to_tool::<GetPipelineRunTool>(),
            to_tool::<ListPipelineRunsTool>(),
            to_tool::<ListIterationsTool>(),
            to_tool::<GetIterationWorkItemsTool>(),
            to_tool::<ListTeamMembersTool>(),
            to_tool::<ListProjectsTool>(),
        ]
    }

    /// Dispatch a tool call by name.
    ///
    /// `arguments` must be a JSON object; `null` counts as no arguments.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ToolError> {
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => JsonObject::new(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {other}"
                )));
            }
        };
        let client = self.client.as_ref();

        match name {
            QueryWorkItemsTool::NAME => invoke::<QueryWorkItemsTool>(client, args).await,
            GetWorkItemTool::NAME => invoke::<GetWorkItemTool>(client, args).await,
            CreateWorkItemTool::NAME => invoke::<CreateWorkItemTool>(client, args).await,
            UpdateWorkItemTool::NAME => invoke::<UpdateWorkItemTool>(client, args).await,
            ListWorkItemTypesTool::NAME => invoke::<ListWorkItemTypesTool>(client, args).await,
            AddWorkItemCommentTool::NAME => invoke::<AddWorkItemCommentTool>(client, args).await,
            ListRepositoriesTool::NAME => invoke::<ListRepositoriesTool>(client, args).await,
            ListPullRequestsTool::NAME => invoke::<ListPullRequestsTool>(client, args).await,
            GetPullRequestTool::NAME => invoke::<GetPullRequestTool>(client, args).await,
            CreatePullRequestTool::NAME => invoke::<CreatePullRequestTool>(client, args).await,
            UpdatePullRequestTool::NAME => invoke::<UpdatePullRequestTool>(client, args).await,
            ListBranchesTool::NAME => invoke::<ListBranchesTool>(client, args).await,
            ListPipelinesTool::NAME => invoke::<ListPipelinesTool>(client, args).await,
            RunPipelineTool::NAME => invoke::<RunPipelineTool>(client, args).await,
            GetPipelineRunTool::NAME => invoke::<GetPipelineRunTool>(client, args).await,
            ListPipelineRunsTool::NAME => invoke::<ListPipelineRunsTool>(client, args).await,
            ListIterationsTool::NAME => invoke::<ListIterationsTool>(client, args).await,
            GetIterationWorkItemsTool::NAME => {
                invoke::<GetIterationWorkItemsTool>(client, args).await
            }
            ListTeamMembersTool::NAME => invoke::<ListTeamMembersTool>(client, args).await,
            ListProjectsTool::NAME => invoke::<ListProjectsTool>(client, args).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}
