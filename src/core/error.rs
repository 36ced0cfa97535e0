//! Error types and handling for the MCP server.
//!
//! Startup configuration and tool catalog serialization report through
//! [`Error`]. Azure DevOps failures stay in [`crate::ado::AdoError`] and tool
//! dispatch failures in [`crate::domains::tools::ToolError`].

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for server setup and catalog operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
