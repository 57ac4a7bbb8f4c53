use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::models::firewall_rule::FirewallRules;
use crate::models::sql_database::SqlDatabases;
use crate::service::SqlService;
use crate::types::{self, SqlServerParams};

const KIND: &str = "SqlServer";

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlServerAttributes {
    pub id: Option<String>,
    pub resource_type: Option<String>,
    pub name: Option<String>,
    pub resource_group: Option<String>,
    pub location: Option<String>,
    pub version: Option<String>,
    pub state: Option<String>,
    pub administrator_login: Option<String>,
    /// Write-only; never returned by the service.
    #[serde(skip_serializing)]
    pub administrator_login_password: Option<String>,
    pub fully_qualified_domain_name: Option<String>,
}

impl fmt::Debug for SqlServerAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlServerAttributes")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("resource_group", &self.resource_group)
            .field("location", &self.location)
            .field("version", &self.version)
            .field("state", &self.state)
            .field("administrator_login", &self.administrator_login)
            .field(
                "administrator_login_password",
                &self.administrator_login_password.as_ref().map(|_| "***"),
            )
            .field("fully_qualified_domain_name", &self.fully_qualified_domain_name)
            .finish()
    }
}

impl Attributes for SqlServerAttributes {
    fn apply(&self, parsed: Self) -> Self {
        Self {
            administrator_login_password: self.administrator_login_password.clone(),
            ..parsed
        }
    }
}

pub struct SqlServer {
    service: Arc<dyn SqlService>,
    pub attributes: SqlServerAttributes,
}

impl fmt::Debug for SqlServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlServer")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl SqlServer {
    pub fn new(service: Arc<dyn SqlService>, attributes: SqlServerAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(server: &types::SqlServer) -> SqlServerAttributes {
        let p = &server.properties;
        SqlServerAttributes {
            id: Some(server.id.clone()),
            resource_type: server.resource_type.clone(),
            name: Some(server.name.clone()),
            resource_group: resource_group_from_id(&server.id),
            location: Some(server.location.clone()),
            version: p.version.clone(),
            state: p.state.clone(),
            administrator_login: p.administrator_login.clone(),
            administrator_login_password: None,
            fully_qualified_domain_name: p.fully_qualified_domain_name.clone(),
        }
    }

    fn server_params(&self) -> AzureResult<SqlServerParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("resource_group", &a.resource_group)
            .field("location", &a.location)
            .field("version", &a.version)
            .field("administrator_login", &a.administrator_login)
            .field("administrator_login_password", &a.administrator_login_password)
            .check()?;
        Ok(SqlServerParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            version: require(KIND, "version", &a.version)?.to_string(),
            administrator_login: require(KIND, "administrator_login", &a.administrator_login)?.to_string(),
            administrator_login_password: require(
                KIND,
                "administrator_login_password",
                &a.administrator_login_password,
            )?
            .to_string(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.server_params()?;
        let server = self.service.create_or_update_sql_server(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&server));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_sql_server(rg, name).await
    }

    pub fn databases(&self) -> AzureResult<SqlDatabases> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        Ok(SqlDatabases::new(self.service.clone()).in_server(rg, name))
    }

    pub fn firewall_rules(&self) -> AzureResult<FirewallRules> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        Ok(FirewallRules::new(self.service.clone()).in_server(rg, name))
    }
}

pub struct SqlServers {
    service: Arc<dyn SqlService>,
    pub resource_group: Option<String>,
    loaded: Vec<SqlServer>,
}

impl SqlServers {
    pub fn new(service: Arc<dyn SqlService>) -> Self {
        Self {
            service,
            resource_group: None,
            loaded: Vec::new(),
        }
    }

    pub fn in_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self
    }

    pub async fn all(&mut self) -> AzureResult<&[SqlServer]> {
        let rg = require("SqlServers", "resource_group", &self.resource_group)?;
        let servers = self.service.list_sql_servers(rg).await?;
        self.loaded = servers
            .iter()
            .map(|s| SqlServer::new(self.service.clone(), SqlServer::parse(s)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<SqlServer> {
        let server = self.service.get_sql_server(resource_group, name).await?;
        Ok(SqlServer::new(self.service.clone(), SqlServer::parse(&server)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&SqlServer> {
        self.loaded
            .iter()
            .find(|s| s.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[SqlServer] {
        &self.loaded
    }

    pub async fn create(&self, attributes: SqlServerAttributes) -> AzureResult<SqlServer> {
        let mut server = SqlServer::new(self.service.clone(), attributes);
        server.save().await?;
        Ok(server)
    }

    pub async fn check_sql_server_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_sql_server_exists(resource_group, name).await
    }
}
