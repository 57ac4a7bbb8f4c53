//! Remote operations the SQL models depend on.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use azrm_core::{AzureClient, AzureResult};

use crate::types::{
    FirewallRule, FirewallRuleParams, SqlDatabase, SqlDatabaseParams, SqlServer, SqlServerParams,
};
use crate::{databases, firewall_rules, servers};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlService: Send + Sync {
    async fn list_sql_servers(&self, resource_group: &str) -> AzureResult<Vec<SqlServer>>;
    async fn get_sql_server(&self, resource_group: &str, name: &str) -> AzureResult<SqlServer>;
    async fn check_sql_server_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_sql_server(&self, params: &SqlServerParams) -> AzureResult<SqlServer>;
    async fn delete_sql_server(&self, resource_group: &str, name: &str) -> AzureResult<bool>;

    async fn list_databases(&self, resource_group: &str, server_name: &str) -> AzureResult<Vec<SqlDatabase>>;
    async fn get_database(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<SqlDatabase>;
    async fn check_database_exists(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_database(&self, params: &SqlDatabaseParams) -> AzureResult<SqlDatabase>;
    async fn delete_database(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<bool>;

    async fn list_firewall_rules(&self, resource_group: &str, server_name: &str) -> AzureResult<Vec<FirewallRule>>;
    async fn get_firewall_rule(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<FirewallRule>;
    async fn create_or_update_firewall_rule(&self, params: &FirewallRuleParams) -> AzureResult<FirewallRule>;
    async fn delete_firewall_rule(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<bool>;
}

pub struct ArmSqlService {
    client: Arc<AzureClient>,
}

impl ArmSqlService {
    pub fn new(client: Arc<AzureClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SqlService for ArmSqlService {
    async fn list_sql_servers(&self, resource_group: &str) -> AzureResult<Vec<SqlServer>> {
        servers::list_sql_servers(&self.client, resource_group).await
    }

    async fn get_sql_server(&self, resource_group: &str, name: &str) -> AzureResult<SqlServer> {
        servers::get_sql_server(&self.client, resource_group, name).await
    }

    async fn check_sql_server_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        servers::check_sql_server_exists(&self.client, resource_group, name).await
    }

    async fn create_or_update_sql_server(&self, params: &SqlServerParams) -> AzureResult<SqlServer> {
        let server = servers::create_or_update_sql_server(&self.client, params).await?;
        info!("SQL server {} saved", server.id);
        Ok(server)
    }

    async fn delete_sql_server(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        servers::delete_sql_server(&self.client, resource_group, name).await?;
        info!("SQL server {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn list_databases(&self, resource_group: &str, server_name: &str) -> AzureResult<Vec<SqlDatabase>> {
        databases::list_databases(&self.client, resource_group, server_name).await
    }

    async fn get_database(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<SqlDatabase> {
        databases::get_database(&self.client, resource_group, server_name, name).await
    }

    async fn check_database_exists(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<bool> {
        databases::check_database_exists(&self.client, resource_group, server_name, name).await
    }

    async fn create_or_update_database(&self, params: &SqlDatabaseParams) -> AzureResult<SqlDatabase> {
        let database = databases::create_or_update_database(&self.client, params).await?;
        info!("SQL database {} saved", database.id);
        Ok(database)
    }

    async fn delete_database(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<bool> {
        databases::delete_database(&self.client, resource_group, server_name, name).await?;
        info!("SQL database {}/{}/{} deleted", resource_group, server_name, name);
        Ok(true)
    }

    async fn list_firewall_rules(&self, resource_group: &str, server_name: &str) -> AzureResult<Vec<FirewallRule>> {
        firewall_rules::list_firewall_rules(&self.client, resource_group, server_name).await
    }

    async fn get_firewall_rule(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<FirewallRule> {
        firewall_rules::get_firewall_rule(&self.client, resource_group, server_name, name).await
    }

    async fn create_or_update_firewall_rule(&self, params: &FirewallRuleParams) -> AzureResult<FirewallRule> {
        let rule = firewall_rules::create_or_update_firewall_rule(&self.client, params).await?;
        info!("SQL firewall rule {} saved", rule.id);
        Ok(rule)
    }

    async fn delete_firewall_rule(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<bool> {
        firewall_rules::delete_firewall_rule(&self.client, resource_group, server_name, name).await?;
        info!("SQL firewall rule {}/{}/{} deleted", resource_group, server_name, name);
        Ok(true)
    }
}
