//! Azure DevOps MCP Server Library
//!
//! Exposes Azure DevOps work items, Git repositories, pull requests,
//! pipelines and boards as Model Context Protocol tools.
//!
//! # Architecture
//!
//! - **ado**: Authenticated REST client for Azure DevOps Server / Services
//! - **core**: Configuration, error handling, the MCP server and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: One MCP tool per Azure DevOps operation, plus the tool
//!     catalog normalizer
//!
//! # Example
//!
//! ```rust,no_run
//! use ado_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let transport = TransportService::new(config.transport.clone());
//!     transport.run(McpServer::new(config)).await?;
//!     Ok(())
//! }
//! ```

pub mod ado;
pub mod core;
pub mod domains;

pub use ado::{AdoClient, AdoError, RequestOptions, Scope};
pub use core::{Config, Error, McpServer, Result};
