//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP. stdout carries protocol frames
//! only; logs go to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single client on stdin/stdout until it disconnects.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - serving {} v{} via stdin/stdout",
            server.name(),
            server.version()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!("STDIO transport finished");
        Ok(())
    }
}
