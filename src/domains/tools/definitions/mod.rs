//! Tool definitions module.
//!
//! Tools are grouped by Azure DevOps area, one file per area.

pub mod boards;
pub mod git;
pub mod pipelines;
pub mod work_items;

pub use boards::{
    GetIterationWorkItemsTool, ListIterationsTool, ListProjectsTool, ListTeamMembersTool,
};
pub use git::{
    CreatePullRequestTool, GetPullRequestTool, ListBranchesTool, ListPullRequestsTool,
    ListRepositoriesTool, UpdatePullRequestTool,
};
pub use pipelines::{GetPipelineRunTool, ListPipelineRunsTool, ListPipelinesTool, RunPipelineTool};
pub use work_items::{
    AddWorkItemCommentTool, CreateWorkItemTool, GetWorkItemTool, ListWorkItemTypesTool,
    QueryWorkItemsTool, UpdateWorkItemTool,
};
