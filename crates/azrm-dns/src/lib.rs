//! # azrm-dns
//!
//! Azure DNS zones and the `A` / `CNAME` record sets inside them.

pub mod types;
pub mod zones;
pub mod record_sets;
pub mod service;
pub mod models;

pub use models::record_set::{RecordSet, RecordSetAttributes, RecordSets};
pub use models::zone::{Zone, ZoneAttributes, Zones};
pub use service::{ArmDnsService, DnsService};
