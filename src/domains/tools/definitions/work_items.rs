//! Work item tools: WIQL queries, reads, creation, updates and comments.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::ado::{AdoClient, AdoResult, ListResponse, PatchOperation, RequestOptions, WiqlResult};
use crate::domains::tools::handlers::{AdoTool, NoParams, ToolReply};

/// At most this many WIQL hits are fetched in full; the rest are dropped.
pub const WIQL_FETCH_LIMIT: usize = 200;

/// Reply when a WIQL query matches nothing.
pub const NO_WORK_ITEMS: &str = "No work items found.";

// ============================================================================
// ado_query_work_items
// ============================================================================

/// Parameters for a WIQL query.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryWorkItemsParams {
    /// WIQL query string.
    #[schemars(description = "WIQL query string")]
    pub query: String,
}

/// Runs a WIQL query and fetches the matching work items.
#[derive(Debug, Clone)]
pub struct QueryWorkItemsTool;

#[async_trait::async_trait]
impl AdoTool for QueryWorkItemsTool {
    const NAME: &'static str = "ado_query_work_items";
    const DESCRIPTION: &'static str = "Query work items using WIQL (Work Item Query Language). Example: \"SELECT [System.Id], [System.Title], [System.State] FROM WorkItems WHERE [System.AssignedTo] = @Me AND [System.State] <> 'Closed'\"";
    type Params = QueryWorkItemsParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let wiql: WiqlResult = client
            .request("wit/wiql", RequestOptions::post(json!({ "query": params.query })))
            .await?;

        if wiql.work_items.is_empty() {
            return Ok(ToolReply::text(NO_WORK_ITEMS));
        }

        if wiql.work_items.len() > WIQL_FETCH_LIMIT {
            debug!(
                "WIQL matched {} work items, fetching the first {}",
                wiql.work_items.len(),
                WIQL_FETCH_LIMIT
            );
        }

        let ids = wiql
            .ids(WIQL_FETCH_LIMIT)
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let details: ListResponse = client
            .request(
                &format!("wit/workitems?ids={ids}&$expand=all"),
                RequestOptions::get(),
            )
            .await?;

        Ok(ToolReply::json(details.value))
    }
}

// ============================================================================
// ado_get_work_item
// ============================================================================

/// Parameters for fetching a work item.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWorkItemParams {
    /// Work item ID.
    #[schemars(description = "Work item ID")]
    pub id: u64,
}

/// Fetches one work item with all fields and relations.
#[derive(Debug, Clone)]
pub struct GetWorkItemTool;

#[async_trait::async_trait]
impl AdoTool for GetWorkItemTool {
    const NAME: &'static str = "ado_get_work_item";
    const DESCRIPTION: &'static str = "Get a single work item by ID with all fields";
    type Params = GetWorkItemParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let item: Value = client
            .request(
                &format!("wit/workitems/{}?$expand=all", params.id),
                RequestOptions::get(),
            )
            .await?;
        Ok(ToolReply::json(item))
    }
}

// ============================================================================
// ado_create_work_item
// ============================================================================

/// Parameters for creating a work item.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkItemParams {
    /// Work item type, e.g. "Task", "Bug", "User Story".
    #[serde(rename = "type")]
    #[schemars(description = "Work item type, e.g. \"Task\", \"Bug\", \"User Story\"")]
    pub work_item_type: String,

    /// Title of the work item.
    #[schemars(description = "Title of the work item")]
    pub title: String,

    /// HTML description of the work item.
    #[schemars(description = "HTML description of the work item")]
    pub description: Option<String>,

    /// Display name or email of the person to assign.
    #[schemars(description = "Display name or email of the person to assign")]
    pub assigned_to: Option<String>,

    /// Area path.
    #[schemars(description = "Area path")]
    pub area_path: Option<String>,

    /// Iteration/sprint path.
    #[schemars(description = "Iteration/sprint path")]
    pub iteration_path: Option<String>,

    /// Extra fields keyed by field reference name.
    #[schemars(
        description = "Additional fields as key-value pairs, where key is the field reference name (e.g. \"System.Tags\")"
    )]
    pub additional_fields: Option<BTreeMap<String, Value>>,
}

impl CreateWorkItemParams {
    /// The `add` operations describing the new work item.
    ///
    /// Empty optional strings are treated as absent.
    pub fn operations(&self) -> Vec<PatchOperation> {
        let mut operations = vec![PatchOperation::add_field("System.Title", self.title.as_str())];

        let optional = [
            ("System.Description", &self.description),
            ("System.AssignedTo", &self.assigned_to),
            ("System.AreaPath", &self.area_path),
            ("System.IterationPath", &self.iteration_path),
        ];
        for (field, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                operations.push(PatchOperation::add_field(field, value));
            }
        }

        if let Some(extra) = &self.additional_fields {
            for (field, value) in extra {
                operations.push(PatchOperation::add_field(field, value.clone()));
            }
        }

        operations
    }
}

/// Creates a work item through a JSON Patch document.
#[derive(Debug, Clone)]
pub struct CreateWorkItemTool;

#[async_trait::async_trait]
impl AdoTool for CreateWorkItemTool {
    const NAME: &'static str = "ado_create_work_item";
    const DESCRIPTION: &'static str = "Create a new work item (Bug, Task, User Story, etc.)";
    type Params = CreateWorkItemParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let item: Value = client
            .request_patch(
                &format!("wit/workitems/${}", params.work_item_type),
                &params.operations(),
                RequestOptions::default(),
            )
            .await?;
        Ok(ToolReply::json(item))
    }
}

// ============================================================================
// ado_update_work_item
// ============================================================================

/// Parameters for updating a work item.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateWorkItemParams {
    /// Work item ID.
    #[schemars(description = "Work item ID")]
    pub id: u64,

    /// Fields to replace, keyed by field reference name.
    #[schemars(
        description = "Fields to update as key-value pairs (e.g. {\"System.State\": \"Active\", \"System.AssignedTo\": \"user@example.com\"})"
    )]
    pub fields: BTreeMap<String, Value>,
}

/// Replaces fields on an existing work item.
#[derive(Debug, Clone)]
pub struct UpdateWorkItemTool;

#[async_trait::async_trait]
impl AdoTool for UpdateWorkItemTool {
    const NAME: &'static str = "ado_update_work_item";
    const DESCRIPTION: &'static str = "Update fields on an existing work item";
    type Params = UpdateWorkItemParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let operations: Vec<PatchOperation> = params
            .fields
            .into_iter()
            .map(|(field, value)| PatchOperation::replace_field(&field, value))
            .collect();

        let item: Value = client
            .request_patch(
                &format!("wit/workitems/{}", params.id),
                &operations,
                RequestOptions::default(),
            )
            .await?;
        Ok(ToolReply::json(item))
    }
}

// ============================================================================
// ado_list_work_item_types
// ============================================================================

/// Lists the work item types of the project.
#[derive(Debug, Clone)]
pub struct ListWorkItemTypesTool;

#[async_trait::async_trait]
impl AdoTool for ListWorkItemTypesTool {
    const NAME: &'static str = "ado_list_work_item_types";
    const DESCRIPTION: &'static str = "List available work item types for the project";
    type Params = NoParams;

    async fn execute(client: &AdoClient, _params: NoParams) -> AdoResult<ToolReply> {
        let types: ListResponse = client
            .request("wit/workitemtypes", RequestOptions::get())
            .await?;
        Ok(ToolReply::json(types.value))
    }
}

// ============================================================================
// ado_add_work_item_comment
// ============================================================================

/// Parameters for commenting on a work item.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddWorkItemCommentParams {
    /// Work item ID.
    #[schemars(description = "Work item ID")]
    pub id: u64,

    /// Comment text (supports HTML).
    #[schemars(description = "Comment text (supports HTML)")]
    pub text: String,
}

/// Adds a comment to a work item.
#[derive(Debug, Clone)]
pub struct AddWorkItemCommentTool;

#[async_trait::async_trait]
impl AdoTool for AddWorkItemCommentTool {
    const NAME: &'static str = "ado_add_work_item_comment";
    const DESCRIPTION: &'static str = "Add a comment to a work item";
    type Params = AddWorkItemCommentParams;

    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply> {
        let comment: Value = client
            .request(
                &format!("wit/workitems/{}/comments", params.id),
                RequestOptions::post(json!({ "text": params.text })),
            )
            .await?;
        Ok(ToolReply::json(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::handlers::invoke;
    use crate::domains::tools::handlers::test_support::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    #[tokio::test]
    async fn test_query_work_items_fetches_details() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/DefaultCollection/Proj/_apis/wit/wiql"))
            .and(body_json(json!({ "query": "SELECT [System.Id] FROM WorkItems" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "workItems": [{ "id": 5, "url": "u5" }, { "id": 8, "url": "u8" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/DefaultCollection/Proj/_apis/wit/workitems"))
            .and(query_param("ids", "5,8"))
            .and(query_param("$expand", "all"))
            .and(query_param("api-version", "7.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "value": [{ "id": 5 }, { "id": 8 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<QueryWorkItemsTool>(
            &client,
            args(json!({ "query": "SELECT [System.Id] FROM WorkItems" })),
        )
        .await
        .unwrap();

        assert_eq!(json(&result), json!([{ "id": 5 }, { "id": 8 }]));
    }

    #[tokio::test]
    async fn test_query_work_items_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "workItems": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<QueryWorkItemsTool>(&client, args(json!({ "query": "q" })))
            .await
            .unwrap();
        assert_eq!(text(&result), NO_WORK_ITEMS);
    }

    #[tokio::test]
    async fn test_query_work_items_truncates_to_limit() {
        let hits: Vec<Value> = (1..=250).map(|id| json!({ "id": id, "url": "u" })).collect();
        let expected_ids = (1..=200).map(|id: u64| id.to_string()).collect::<Vec<_>>().join(",");

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "workItems": hits })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("ids", expected_ids.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<QueryWorkItemsTool>(&client, args(json!({ "query": "q" })))
            .await
            .unwrap();
        assert!(!is_error(&result));
    }

    #[tokio::test]
    async fn test_get_work_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DefaultCollection/Proj/_apis/wit/workitems/42"))
            .and(query_param("$expand", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42, "rev": 3 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<GetWorkItemTool>(&client, args(json!({ "id": 42 })))
            .await
            .unwrap();
        assert_eq!(json(&result)["rev"], 3);
    }

    #[tokio::test]
    async fn test_get_work_item_invalid_arguments() {
        let client = client_for("http://127.0.0.1:9");
        let err = invoke::<GetWorkItemTool>(&client, args(json!({ "id": "abc" })))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid arguments"));
    }

    #[test]
    fn test_create_operations_order_and_skips() {
        let params: CreateWorkItemParams = serde_json::from_value(json!({
            "type": "Bug",
            "title": "Crash on save",
            "description": "",
            "assignedTo": "dev@example.com",
            "additionalFields": { "System.Tags": "ui", "Microsoft.VSTS.Common.Priority": 1 }
        }))
        .unwrap();

        let ops = serde_json::to_value(params.operations()).unwrap();
        assert_eq!(
            ops,
            json!([
                { "op": "add", "path": "/fields/System.Title", "value": "Crash on save" },
                { "op": "add", "path": "/fields/System.AssignedTo", "value": "dev@example.com" },
                { "op": "add", "path": "/fields/Microsoft.VSTS.Common.Priority", "value": 1 },
                { "op": "add", "path": "/fields/System.Tags", "value": "ui" }
            ])
        );
    }

    #[tokio::test]
    async fn test_create_work_item_uses_json_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/DefaultCollection/Proj/_apis/wit/workitems/$Task"))
            .and(header("content-type", "application/json-patch+json"))
            .and(body_json(json!([
                { "op": "add", "path": "/fields/System.Title", "value": "Write docs" }
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 100 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<CreateWorkItemTool>(
            &client,
            args(json!({ "type": "Task", "title": "Write docs" })),
        )
        .await
        .unwrap();
        assert_eq!(json(&result)["id"], 100);
    }

    #[tokio::test]
    async fn test_update_work_item_replaces_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/DefaultCollection/Proj/_apis/wit/workitems/7"))
            .and(body_json(json!([
                { "op": "replace", "path": "/fields/System.State", "value": "Active" }
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<UpdateWorkItemTool>(
            &client,
            args(json!({ "id": 7, "fields": { "System.State": "Active" } })),
        )
        .await
        .unwrap();
        assert!(!is_error(&result));
    }

    #[tokio::test]
    async fn test_add_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/DefaultCollection/Proj/_apis/wit/workitems/7/comments"))
            .and(body_json(json!({ "text": "<b>done</b>" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "text": "<b>done</b>" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<AddWorkItemCommentTool>(
            &client,
            args(json!({ "id": 7, "text": "<b>done</b>" })),
        )
        .await
        .unwrap();
        assert_eq!(json(&result)["id"], 1);
    }

    #[tokio::test]
    async fn test_remote_error_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("TF401232: not found"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<ListWorkItemTypesTool>(&client, args(json!({})))
            .await
            .unwrap();
        assert!(is_error(&result));
        assert_eq!(text(&result), "ADO API error 404 Not Found: TF401232: not found");
    }

    #[tokio::test]
    async fn test_list_work_item_types_returns_value_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/DefaultCollection/Proj/_apis/wit/workitemtypes"))
            .and(query_param("api-version", "7.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "value": [{ "name": "Bug" }, { "name": "Task" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<ListWorkItemTypesTool>(&client, args(json!({})))
            .await
            .unwrap();
        assert_eq!(json(&result), json!([{ "name": "Bug" }, { "name": "Task" }]));
    }
}
