//! # azrm-resources
//!
//! Resource groups: the scope every other resource kind lives in.

pub mod types;
pub mod resource_groups;
pub mod service;
pub mod models;

pub use models::resource_group::{ResourceGroup, ResourceGroupAttributes, ResourceGroups};
pub use service::{ArmResourcesService, ResourcesService};
