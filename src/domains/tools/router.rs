//! Tool Router - builds the rmcp ToolRouter for STDIO/TCP transport.
//!
//! Every route shares one [`AdoClient`].

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    AddWorkItemCommentTool, CreatePullRequestTool, CreateWorkItemTool, GetIterationWorkItemsTool,
    GetPipelineRunTool, GetPullRequestTool, GetWorkItemTool, ListBranchesTool, ListIterationsTool,
    ListPipelineRunsTool, ListPipelinesTool, ListProjectsTool, ListPullRequestsTool,
    ListRepositoriesTool, ListTeamMembersTool, ListWorkItemTypesTool, QueryWorkItemsTool,
    RunPipelineTool, UpdatePullRequestTool, UpdateWorkItemTool,
};
use super::handlers::create_route;
use crate::ado::AdoClient;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<AdoClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        // Work items
        .with_route(create_route::<QueryWorkItemsTool, S>(client.clone()))
        .with_route(create_route::<GetWorkItemTool, S>(client.clone()))
        .with_route(create_route::<CreateWorkItemTool, S>(client.clone()))
        .with_route(create_route::<UpdateWorkItemTool, S>(client.clone()))
        .with_route(create_route::<ListWorkItemTypesTool, S>(client.clone()))
        .with_route(create_route::<AddWorkItemCommentTool, S>(client.clone()))
        // Git
        .with_route(create_route::<ListRepositoriesTool, S>(client.clone()))
        .with_route(create_route::<ListPullRequestsTool, S>(client.clone()))
        .with_route(create_route::<GetPullRequestTool, S>(client.clone()))
        .with_route(create_route::<CreatePullRequestTool, S>(client.clone()))
        .with_route(create_route::<UpdatePullRequestTool, S>(client.clone()))
        .with_route(create_route::<ListBranchesTool, S>(client.clone()))
        // Pipelines
        .with_route(create_route::<ListPipelinesTool, S>(client.clone()))
        .with_route(create_route::<RunPipelineTool, S>(client.clone()))
        .with_route(create_route::<GetPipelineRunTool, S>(client.clone()))
        .with_route(create_route::<ListPipelineRunsTool, S>(client.clone()))
        // Boards
        .with_route(create_route::<ListIterationsTool, S>(client.clone()))
        .with_route(create_route::<GetIterationWorkItemsTool, S>(client.clone()))
        .with_route(create_route::<ListTeamMembersTool, S>(client.clone()))
        .with_route(create_route::<ListProjectsTool, S>(client))
}
