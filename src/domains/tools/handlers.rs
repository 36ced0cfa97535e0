//! Tool handlers module.
//!
//! Every Azure DevOps tool follows the same shape: deserialize the
//! arguments, make one or two REST calls, render the JSON as text. The
//! [`AdoTool`] trait captures the per-tool part; the functions here provide
//! the shared plumbing for both the rmcp router and the HTTP registry.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::error::ToolError;
use crate::ado::{AdoClient, AdoResult};

/// Arguments of tools that take none.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// What a tool hands back before it is rendered as MCP content.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReply {
    /// Rendered as pretty-printed JSON.
    Json(Value),
    /// Rendered verbatim.
    Text(String),
}

impl ToolReply {
    pub fn json(value: impl Into<Value>) -> Self {
        Self::Json(value.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Render as a single text content item.
    pub fn into_call_result(self) -> Result<CallToolResult, serde_json::Error> {
        let text = match self {
            Self::Json(value) => serde_json::to_string_pretty(&value)?,
            Self::Text(text) => text,
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

/// A tool backed by the Azure DevOps REST API.
#[async_trait::async_trait]
pub trait AdoTool: Send + Sync + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Typed arguments; their JSON schema is the tool's input schema.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Perform the REST call(s) for one invocation.
    async fn execute(client: &AdoClient, params: Self::Params) -> AdoResult<ToolReply>;
}

/// Create a Tool model for `T` (metadata).
pub fn to_tool<T: AdoTool>() -> Tool {
    Tool {
        name: T::NAME.into(),
        description: Some(T::DESCRIPTION.into()),
        input_schema: cached_schema_for_type::<T::Params>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Run `T` against `arguments`.
///
/// Malformed arguments are a protocol error. A failed REST call is a tool
/// error result carrying the remote status and body, so the caller sees it.
#[instrument(skip_all, fields(tool = T::NAME))]
pub async fn invoke<T: AdoTool>(
    client: &AdoClient,
    arguments: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let params: T::Params = serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

    info!("Tool called");

    match T::execute(client, params).await {
        Ok(reply) => reply
            .into_call_result()
            .map_err(|e| ToolError::internal(e.to_string())),
        Err(e) => {
            warn!("Tool failed: {}", e);
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
    }
}

/// Create a ToolRoute for STDIO/TCP transport.
pub fn create_route<T, S>(client: Arc<AdoClient>) -> ToolRoute<S>
where
    T: AdoTool,
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(to_tool::<T>(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let client = client.clone();
        async move {
            invoke::<T>(&client, args)
                .await
                .map_err(ToolError::into_mcp_error)
        }
        .boxed()
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use rmcp::model::{CallToolResult, JsonObject, RawContent};
    use serde_json::Value;

    use crate::ado::AdoClient;
    use crate::core::config::AdoConfig;

    /// A client pointed at a mock server.
    pub fn client_for(uri: &str) -> AdoClient {
        AdoClient::new(&AdoConfig {
            base_url: uri.to_string(),
            collection: "DefaultCollection".to_string(),
            pat: "test-pat".to_string(),
            project: "Proj".to_string(),
            api_version: "7.0".to_string(),
        })
    }

    pub fn args(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object arguments, got {other}"),
        }
    }

    pub fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    pub fn json(result: &CallToolResult) -> Value {
        serde_json::from_str(text(result)).expect("tool output is JSON")
    }

    pub fn is_error(result: &CallToolResult) -> bool {
        result.is_error.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    struct EchoProjectTool;

    #[async_trait::async_trait]
    impl AdoTool for EchoProjectTool {
        const NAME: &'static str = "echo_project";
        const DESCRIPTION: &'static str = "Returns the configured project";
        type Params = NoParams;

        async fn execute(client: &AdoClient, _params: NoParams) -> AdoResult<ToolReply> {
            let value: Value = client
                .request("projects", crate::ado::RequestOptions::get())
                .await?;
            Ok(ToolReply::json(json!({ "project": client.project(), "remote": value })))
        }
    }

    #[test]
    fn test_reply_json_is_pretty_printed() {
        let result = ToolReply::json(json!({ "id": 1 })).into_call_result().unwrap();
        assert_eq!(text(&result), "{\n  \"id\": 1\n}");
        assert!(!is_error(&result));
    }

    #[test]
    fn test_reply_text_verbatim() {
        let result = ToolReply::text("No work items found.").into_call_result().unwrap();
        assert_eq!(text(&result), "No work items found.");
    }

    #[test]
    fn test_to_tool_metadata() {
        let tool = to_tool::<EchoProjectTool>();
        assert_eq!(tool.name, "echo_project");
        assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
    }

    #[tokio::test]
    async fn test_invoke_renders_remote_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<EchoProjectTool>(&client, JsonObject::new()).await.unwrap();
        assert_eq!(json(&result), json!({ "project": "Proj", "remote": { "ok": true } }));
    }

    #[tokio::test]
    async fn test_invoke_remote_failure_is_tool_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let result = invoke::<EchoProjectTool>(&client, JsonObject::new()).await.unwrap();
        assert!(is_error(&result));
        assert!(text(&result).contains("401"));
        assert!(text(&result).contains("Access denied"));
    }
}
