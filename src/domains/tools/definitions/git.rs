//! Git tools: repositories, pull requests and refs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::ado::{AdoClient, AdoResult, ListResponse, RequestOptions};
use crate::domains::tools::handlers::{AdoTool, NoParams, ToolReply};

/// Status filter accepted when listing pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatusFilter {
    Active,
    Abandoned,
    Completed,
    All,
}

impl PullRequestStatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Abandoned => "abandoned",
            Self::Completed => "completed",
            Self::All => "all",
        }
    }
}

/// Status a pull request can be moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatus {
    Active,
    Abandoned,
    Completed,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// ado_list_repositories
// ============================================================================

/// Lists the project's Git repositories.
#[derive(Debug, Clone)]
pub struct ListRepositoriesTool;

#[async_trait::async_trait]
impl AdoTool for ListRepositoriesTool {
    const NAME: &'static str = "ado_list_repositories";
    const DESCRIPTION: &'static str = "List Git repositories in the project";
    type Params = NoParams;

    async fn execute(client: &AdoClient, _params: NoParams) -> AdoResult<ToolReply> {
        let repos: ListResponse = client
            .request("git/repositories", RequestOptions::get())
            .await?;
        Ok(ToolReply::json(repos.value))
    }
}

// ============================================================================
// ado_list_pull_requests
// ============================================================================

/// Parameters for listing pull requests.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPullRequestsParams {
    /// Repository ID or name.
    #[schemars(description = "Repository ID or name")]
    pub repository_id: String,

    /// PR status filter (default: active).
    #[schemars(description = "PR status filter (default: active)")]
    pub status: Option<PullRequestStatusFilter>,

    /// Filter by creator ID.
    #[schemars(description = "Filter by creator ID")]
    pub creator_id: Option<String>,

    /// Max number of PRs to return.
    #[schemars(description = "Max number of PRs to return")]
    pub top: Option<u32>,
}

impl ListPullRequestsParams {
    /// Resource path including the form-encoded search criteria.
    pub fn path(&self) -> AdoResult<String> {
        let mut criteria: Vec<(&str, String)> = Vec::new();
        if let Some(status) = self.status {
            criteria.push(("searchCriteria.status", status.as_str().to_string()));
        }
        if let Some(creator) = self.creator_id.as_deref().filter(|c| !c.is_empty()) {
            criteria.push(("searchCriteria.creatorId", creator.to_string()));
        }
        if let Some(top) = self.top.filter(|t| *t > 0) {
            criteria.push(("$top", top.to_string()));
        }

        let base = format!("git/repositories/{}/pullrequests", self.repository_id);
        if criteria.is_empty() {
            return Ok(base);
        }
        Ok(format!("{base}?{}", serde_urlencoded::to_string(&criteria)?))
    }
}

/// Lists pull requests of a repository.
#[derive(Debug, Clone)]
pub struct ListPullRequestsTool;

#[async_trait::async_trait]
impl AdoTool for ListPullRequestsTool {
    const NAME: &'static str = "ado_list_pull_requests";
    const DESCRIPTION: &'static str =
        "List pull requests for a repository, optionally filtered by status";
    type Params = ListPullRequestsParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let prs: ListResponse = client
            .request(&params.path()?, RequestOptions::get())
            .await?;
        Ok(ToolReply::json(prs.value))
    }
}

// ============================================================================
// ado_get_pull_request
// ============================================================================

/// Parameters for fetching a pull request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPullRequestParams {
    /// Repository ID or name.
    #[schemars(description = "Repository ID or name")]
    pub repository_id: String,

    /// Pull request ID.
    #[schemars(description = "Pull request ID")]
    pub pull_request_id: u64,
}

/// Fetches one pull request.
#[derive(Debug, Clone)]
pub struct GetPullRequestTool;

#[async_trait::async_trait]
impl AdoTool for GetPullRequestTool {
    const NAME: &'static str = "ado_get_pull_request";
    const DESCRIPTION: &'static str = "Get details of a specific pull request";
    type Params = GetPullRequestParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let pr: Value = client
            .request(
                &format!(
                    "git/repositories/{}/pullrequests/{}",
                    params.repository_id, params.pull_request_id
                ),
                RequestOptions::get(),
            )
            .await?;
        Ok(ToolReply::json(pr))
    }
}

// ============================================================================
// ado_create_pull_request
// ============================================================================

/// A reviewer to add to a new pull request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Reviewer {
    pub id: String,
}

/// Parameters for creating a pull request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestParams {
    /// Repository ID or name.
    #[schemars(description = "Repository ID or name")]
    pub repository_id: String,

    /// PR title.
    #[schemars(description = "PR title")]
    pub title: String,

    /// PR description.
    #[schemars(description = "PR description")]
    pub description: Option<String>,

    /// Source branch ref (e.g. refs/heads/feature-branch).
    #[schemars(description = "Source branch ref (e.g. refs/heads/feature-branch)")]
    pub source_ref_name: String,

    /// Target branch ref (e.g. refs/heads/main).
    #[schemars(description = "Target branch ref (e.g. refs/heads/main)")]
    pub target_ref_name: String,

    /// Array of reviewer objects with id field.
    #[schemars(description = "Array of reviewer objects with id field")]
    pub reviewers: Option<Vec<Reviewer>>,
}

/// Opens a pull request.
#[derive(Debug, Clone)]
pub struct CreatePullRequestTool;

#[async_trait::async_trait]
impl AdoTool for CreatePullRequestTool {
    const NAME: &'static str = "ado_create_pull_request";
    const DESCRIPTION: &'static str = "Create a new pull request";
    type Params = CreatePullRequestParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let body = json!({
            "title": params.title,
            "description": params.description.unwrap_or_default(),
            "sourceRefName": params.source_ref_name,
            "targetRefName": params.target_ref_name,
            "reviewers": params.reviewers.unwrap_or_default(),
        });

        let pr: Value = client
            .request(
                &format!("git/repositories/{}/pullrequests", params.repository_id),
                RequestOptions::post(body),
            )
            .await?;
        Ok(ToolReply::json(pr))
    }
}

// ============================================================================
// ado_update_pull_request
// ============================================================================

/// Parameters for updating a pull request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePullRequestParams {
    /// Repository ID or name.
    #[schemars(description = "Repository ID or name")]
    pub repository_id: String,

    /// Pull request ID.
    #[schemars(description = "Pull request ID")]
    pub pull_request_id: u64,

    /// New PR status.
    #[schemars(description = "New PR status")]
    pub status: Option<PullRequestStatus>,

    /// New title.
    #[schemars(description = "New title")]
    pub title: Option<String>,

    /// New description.
    #[schemars(description = "New description")]
    pub description: Option<String>,

    /// Required when completing a PR: the last merge source commit ID.
    #[schemars(description = "Required when completing a PR: the last merge source commit ID")]
    pub last_merge_source_commit_id: Option<String>,
}

impl UpdatePullRequestParams {
    /// Update body holding only the provided, non-empty values.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(status) = self.status {
            body.insert("status".into(), json!(status));
        }
        if let Some(title) = non_empty(self.title.clone()) {
            body.insert("title".into(), json!(title));
        }
        if let Some(description) = non_empty(self.description.clone()) {
            body.insert("description".into(), json!(description));
        }
        if let Some(commit_id) = non_empty(self.last_merge_source_commit_id.clone()) {
            body.insert(
                "lastMergeSourceCommit".into(),
                json!({ "commitId": commit_id }),
            );
        }
        Value::Object(body)
    }
}

/// Updates status, title or description of a pull request.
#[derive(Debug, Clone)]
pub struct UpdatePullRequestTool;

#[async_trait::async_trait]
impl AdoTool for UpdatePullRequestTool {
    const NAME: &'static str = "ado_update_pull_request";
    const DESCRIPTION: &'static str =
        "Update a pull request (e.g. change status to completed/abandoned, update title/description)";
    type Params = UpdatePullRequestParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let pr: Value = client
            .request(
                &format!(
                    "git/repositories/{}/pullrequests/{}",
                    params.repository_id, params.pull_request_id
                ),
                RequestOptions::patch(params.body()),
            )
            .await?;
        Ok(ToolReply::json(pr))
    }
}

// ============================================================================
// ado_list_branches
// ============================================================================

/// Parameters for listing branches.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListBranchesParams {
    /// Repository ID or name.
    #[schemars(description = "Repository ID or name")]
    pub repository_id: String,

    /// Filter by ref name prefix (e.g. "heads/main").
    #[schemars(description = "Filter by ref name prefix (e.g. \"heads/main\")")]
    pub filter: Option<String>,
}

/// Lists the refs of a repository.
#[derive(Debug, Clone)]
pub struct ListBranchesTool;

#[async_trait::async_trait]
impl AdoTool for ListBranchesTool {
    const NAME: &'static str = "ado_list_branches";
    const DESCRIPTION: &'static str = "List branches (refs) for a repository";
    type Params = ListBranchesParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let mut path = format!("git/repositories/{}/refs", params.repository_id);
        if let Some(filter) = non_empty(params.filter) {
            path.push_str(&format!("?filter={}", urlencoding::encode(&filter)));
        }

        let refs: ListResponse = client.request(&path, RequestOptions::get()).await?;
        Ok(ToolReply::json(refs.value))
    }
}
