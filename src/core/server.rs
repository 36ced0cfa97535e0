//! MCP Server implementation and lifecycle management.
//!
//! The server owns one [`AdoClient`] built from configuration and shares it
//! with every tool route. The ToolRouter is built in
//! `domains/tools/router.rs`; adding a tool does not touch this file.
//!
//! Every transport advertises the same normalized tool declarations.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    model::*,
    service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::ado::AdoClient;
use crate::domains::tools::{ToolDeclaration, build_tool_router, normalize_input_schemas};

#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

const INSTRUCTIONS: &str = "Azure DevOps tools: query and edit work items, browse \
repositories and pull requests, run and inspect pipelines, and list iterations, teams \
and projects. Calls run against the project configured for this server.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Azure DevOps client shared by every tool.
    client: Arc<AdoClient>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let client = Arc::new(AdoClient::new(&config.ado));

        Self {
            tool_router: build_tool_router::<Self>(client.clone()),
            config,
            client,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the Azure DevOps client.
    pub fn client(&self) -> &Arc<AdoClient> {
        &self.client
    }

    /// List all available tools with object input schemas.
    pub fn list_tools(&self) -> Result<Vec<ToolDeclaration>> {
        let declarations = self
            .tool_router
            .list_all()
            .iter()
            .map(ToolDeclaration::from_tool)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(normalize_input_schemas(declarations))
    }

    /// The normalized declarations as rmcp tools (for STDIO/TCP transport).
    pub fn advertised_tools(&self) -> Result<Vec<Tool>> {
        let declarations = serde_json::to_value(self.list_tools()?)?;
        Ok(serde_json::from_value(declarations)?)
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.client.clone());
        let result = registry.call_tool(name, arguments).await?;
        serde_json::to_value(result).map_err(|e| ToolError::internal(e.to_string()))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        let tools = self
            .advertised_tools()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }
}
