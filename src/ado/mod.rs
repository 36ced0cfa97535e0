//! Azure DevOps REST API access.
//!
//! - `client`: authenticated request builder (`AdoClient`)
//! - `patch`: JSON Patch operations for partial updates
//! - `types`: list and WIQL response envelopes
//! - `error`: client error types

pub mod client;
mod error;
pub mod patch;
pub mod types;

pub use client::{AdoClient, RequestOptions, Scope, basic_auth_header};
pub use error::{AdoError, AdoResult};
pub use patch::{PatchOp, PatchOperation};
pub use types::{ListResponse, WiqlResult, WorkItemReference};
