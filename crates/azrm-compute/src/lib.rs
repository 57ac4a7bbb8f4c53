//! # azrm-compute
//!
//! Virtual machines and the compute resources hanging off them.
//!
//! - **Servers** – create (sync or async), get, list, lifecycle actions, data disk attach/detach
//! - **Availability Sets** – create, get, list, delete
//! - **VM Extensions** – list (from the VM payload), get, create or update, delete

pub mod types;
pub mod virtual_machines;
pub mod availability_sets;
pub mod vm_extensions;
pub mod service;
pub mod models;

pub use models::async_response::AsyncResponse;
pub use models::availability_set::{AvailabilitySet, AvailabilitySetAttributes, AvailabilitySets};
pub use models::data_disk::DataDiskAttributes;
pub use models::server::{Server, ServerAttributes, Servers};
pub use models::vm_extension::{
    VirtualMachineExtension, VirtualMachineExtensionAttributes, VirtualMachineExtensions,
};
pub use service::{ArmComputeService, ComputeService};
