//! # azrm
//!
//! Azure Resource Manager resource models. Each resource kind is a model
//! (attributes + `save` / `destroy` / actions) and a collection
//! (`all` / `get`) backed by a service trait, with [`AzureRm`] wiring them
//! to one authenticated client.
//!
//! - [`arm`] – errors, credentials, the ARM HTTP client
//! - [`resources`] – resource groups
//! - [`compute`] – virtual machines, availability sets, VM extensions
//! - [`network`] – virtual networks, subnets, public IPs, NICs, load balancers, NSGs, local network gateways
//! - [`storage`] – storage accounts, blob containers and blobs, parallel block uploads
//! - [`sql`] – SQL servers, databases, firewall rules
//! - [`dns`] – zones and record sets

mod service;

pub use service::AzureRm;

pub use azrm_compute as compute;
pub use azrm_core as arm;
pub use azrm_dns as dns;
pub use azrm_network as network;
pub use azrm_resources as resources;
pub use azrm_sql as sql;
pub use azrm_storage as storage;

pub use azrm_core::{
    AzureClient, AzureConfig, AzureCredentials, AzureError, AzureErrorKind, AzureResult,
};
