//! # azrm-sql
//!
//! Azure SQL logical servers and what hangs off them.
//!
//! - **SQL Servers** – create or update, delete
//! - **Databases** – create (including copies and restores via create mode), delete
//! - **Firewall Rules** – server-level IP ranges

pub mod types;
pub mod servers;
pub mod databases;
pub mod firewall_rules;
pub mod service;
pub mod models;

pub use models::firewall_rule::{FirewallRule, FirewallRuleAttributes, FirewallRules};
pub use models::sql_database::{SqlDatabase, SqlDatabaseAttributes, SqlDatabases};
pub use models::sql_server::{SqlServer, SqlServerAttributes, SqlServers};
pub use service::{ArmSqlService, SqlService};
