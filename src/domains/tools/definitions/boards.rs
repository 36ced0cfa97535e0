//! Boards tools: iterations, team members and projects.
//!
//! Iteration endpoints live under a team; without an explicit team the
//! project's default team is used.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::ado::{AdoClient, AdoResult, ListResponse, RequestOptions, Scope};
use crate::domains::tools::handlers::{AdoTool, NoParams, ToolReply};

fn team_scope(team: Option<&str>) -> Scope {
    Scope::team_or_project(team.filter(|t| !t.is_empty()))
}

/// Parameters for listing iterations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListIterationsParams {
    /// Team name (optional, uses default team).
    #[schemars(description = "Team name (optional, uses default team)")]
    pub team: Option<String>,
}

/// Lists a team's iterations.
#[derive(Debug, Clone)]
pub struct ListIterationsTool;

#[async_trait::async_trait]
impl AdoTool for ListIterationsTool {
    const NAME: &'static str = "ado_list_iterations";
    const DESCRIPTION: &'static str =
        "List iterations/sprints for a team. Uses the default team if no team is specified.";
    type Params = ListIterationsParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let options = RequestOptions::get().with_scope(team_scope(params.team.as_deref()));
        let iterations: ListResponse = client
            .request("work/teamsettings/iterations", options)
            .await?;
        Ok(ToolReply::json(iterations.value))
    }
}

/// Parameters for reading an iteration's work items.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetIterationWorkItemsParams {
    /// Iteration ID (GUID).
    #[schemars(description = "Iteration ID (GUID)")]
    pub iteration_id: String,

    /// Team name (optional, uses default team).
    #[schemars(description = "Team name (optional, uses default team)")]
    pub team: Option<String>,
}

/// Fetches the work item relations of one iteration.
#[derive(Debug, Clone)]
pub struct GetIterationWorkItemsTool;

#[async_trait::async_trait]
impl AdoTool for GetIterationWorkItemsTool {
    const NAME: &'static str = "ado_get_iteration_work_items";
    const DESCRIPTION: &'static str = "Get work items for a specific iteration/sprint";
    type Params = GetIterationWorkItemsParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let options = RequestOptions::get().with_scope(team_scope(params.team.as_deref()));
        let work_items: Value = client
            .request(
                &format!(
                    "work/teamsettings/iterations/{}/workitems",
                    params.iteration_id
                ),
                options,
            )
            .await?;
        Ok(ToolReply::json(work_items))
    }
}

/// Parameters for listing team members.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTeamMembersParams {
    /// Team name.
    #[schemars(description = "Team name")]
    pub team: String,
}

/// Lists the members of a project team.
#[derive(Debug, Clone)]
pub struct ListTeamMembersTool;

#[async_trait::async_trait]
impl AdoTool for ListTeamMembersTool {
    const NAME: &'static str = "ado_list_team_members";
    const DESCRIPTION: &'static str = "List members of a team";
    type Params = ListTeamMembersParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let path = format!(
            "projects/{}/teams/{}/members",
            urlencoding::encode(client.project()),
            urlencoding::encode(&params.team)
        );
        let members: ListResponse = client
            .request(&path, RequestOptions::get().with_scope(Scope::Collection))
            .await?;
        Ok(ToolReply::json(members.value))
    }
}

/// Lists the projects of the collection.
#[derive(Debug, Clone)]
pub struct ListProjectsTool;

#[async_trait::async_trait]
impl AdoTool for ListProjectsTool {
    const NAME: &'static str = "ado_list_projects";
    const DESCRIPTION: &'static str = "List all projects in the Azure DevOps collection";
    type Params = NoParams;

    async fn execute(client: &AdoClient, _params: NoParams) -> AdoResult<ToolReply> {
        let projects: ListResponse = client
            .request("projects", RequestOptions::get().with_scope(Scope::Collection))
            .await?;
        Ok(ToolReply::json(projects.value))
    }
}
