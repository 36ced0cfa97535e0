//! Tools domain module.
//!
//! Every tool is one Azure DevOps REST interaction exposed over MCP.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one file per Azure DevOps area
//! - `handlers.rs` - The [`AdoTool`] trait and shared invocation plumbing
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `catalog.rs` - Tool declarations as exchanged in `tools/list`
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Implement [`AdoTool`] in the matching file under `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a route in `router.rs`
//! 4. Register it in `registry.rs` for HTTP support

pub mod catalog;
pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use catalog::{ToolDeclaration, ToolListing, normalize_input_schemas};
pub use error::ToolError;
pub use handlers::{AdoTool, NoParams, ToolReply, create_route, invoke, to_tool};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
