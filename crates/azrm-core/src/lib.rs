//! # azrm-core
//!
//! Plumbing shared by the Azure Resource Manager resource domains.
//!
//! ## Contents
//!
//! - **Errors** – `AzureError` / `AzureErrorKind`, status-code mapping
//! - **Configuration** – service-principal credentials, endpoints, API versions
//! - **Auth** – client-credentials token acquisition
//! - **Client** – bearer-authenticated ARM HTTP verbs, `nextLink` paging, async operations
//! - **Ids** – resource group / parent / storage account extraction
//! - **Attributes** – required-attribute checks and the parse-then-apply merge

pub mod error;
pub mod types;
pub mod ids;
pub mod attributes;
pub mod auth;
pub mod client;

pub use attributes::{require, Attributes, Requires};
pub use client::AzureClient;
pub use error::{AzureError, AzureErrorKind, AzureResult};
pub use types::{
    ArmList, AsyncOperation, AzureConfig, AzureCredentials, AzureToken, OperationStatus,
    SubResource,
};
