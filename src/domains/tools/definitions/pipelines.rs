//! Pipeline tools: listing, triggering and inspecting runs.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::ado::{AdoClient, AdoResult, ListResponse, RequestOptions};
use crate::domains::tools::handlers::{AdoTool, NoParams, ToolReply};

/// Lists the project's pipelines.
#[derive(Debug, Clone)]
pub struct ListPipelinesTool;

#[async_trait::async_trait]
impl AdoTool for ListPipelinesTool {
    const NAME: &'static str = "ado_list_pipelines";
    const DESCRIPTION: &'static str = "List pipelines in the project";
    type Params = NoParams;

    async fn execute(client: &AdoClient, _params: NoParams) -> AdoResult<ToolReply> {
        let pipelines: ListResponse = client.request("pipelines", RequestOptions::get()).await?;
        Ok(ToolReply::json(pipelines.value))
    }
}

/// A pipeline variable override.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineVariable {
    pub value: String,
}

/// Parameters for triggering a pipeline run.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineParams {
    /// Pipeline ID.
    #[schemars(description = "Pipeline ID")]
    pub pipeline_id: u64,

    /// Branch to run the pipeline on (e.g. "refs/heads/main").
    #[schemars(description = "Branch to run the pipeline on (e.g. \"refs/heads/main\")")]
    pub branch: Option<String>,

    /// Pipeline variables as key-value pairs.
    #[schemars(description = "Pipeline variables as key-value pairs")]
    pub variables: Option<BTreeMap<String, PipelineVariable>>,
}

impl RunPipelineParams {
    /// Run request body; empty when neither branch nor variables are given.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(branch) = self.branch.as_deref().filter(|b| !b.is_empty()) {
            body.insert(
                "resources".into(),
                json!({ "repositories": { "self": { "refName": branch } } }),
            );
        }
        if let Some(variables) = &self.variables {
            body.insert("variables".into(), json!(variables));
        }
        Value::Object(body)
    }
}

/// Queues a pipeline run.
#[derive(Debug, Clone)]
pub struct RunPipelineTool;

#[async_trait::async_trait]
impl AdoTool for RunPipelineTool {
    const NAME: &'static str = "ado_run_pipeline";
    const DESCRIPTION: &'static str = "Trigger a pipeline run";
    type Params = RunPipelineParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let run: Value = client
            .request(
                &format!("pipelines/{}/runs", params.pipeline_id),
                RequestOptions::post(params.body()),
            )
            .await?;
        Ok(ToolReply::json(run))
    }
}

/// Parameters for fetching a pipeline run.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPipelineRunParams {
    /// Pipeline ID.
    #[schemars(description = "Pipeline ID")]
    pub pipeline_id: u64,

    /// Pipeline run ID.
    #[schemars(description = "Pipeline run ID")]
    pub run_id: u64,
}

/// Fetches one pipeline run.
#[derive(Debug, Clone)]
pub struct GetPipelineRunTool;

#[async_trait::async_trait]
impl AdoTool for GetPipelineRunTool {
    const NAME: &'static str = "ado_get_pipeline_run";
    const DESCRIPTION: &'static str = "Get the status and details of a specific pipeline run";
    type Params = GetPipelineRunParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let run: Value = client
            .request(
                &format!("pipelines/{}/runs/{}", params.pipeline_id, params.run_id),
                RequestOptions::get(),
            )
            .await?;
        Ok(ToolReply::json(run))
    }
}

/// Parameters for listing pipeline runs.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPipelineRunsParams {
    /// Pipeline ID.
    #[schemars(description = "Pipeline ID")]
    pub pipeline_id: u64,

    /// Max number of runs to return.
    #[schemars(description = "Max number of runs to return")]
    pub top: Option<u32>,
}

/// Lists recent runs of a pipeline.
#[derive(Debug, Clone)]
pub struct ListPipelineRunsTool;

#[async_trait::async_trait]
impl AdoTool for ListPipelineRunsTool {
    const NAME: &'static str = "ado_list_pipeline_runs";
    const DESCRIPTION: &'static str = "List recent runs for a pipeline";
    type Params = ListPipelineRunsParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let mut path = format!("pipelines/{}/runs", params.pipeline_id);
        if let Some(top) = params.top.filter(|t| *t > 0) {
            path.push_str(&format!("?$top={top}"));
        }

        let runs: ListResponse = client.request(&path, RequestOptions::get()).await?;
        Ok(ToolReply::json(runs.value))
    }
}
