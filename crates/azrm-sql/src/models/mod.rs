pub mod firewall_rule;
pub mod sql_database;
pub mod sql_server;
