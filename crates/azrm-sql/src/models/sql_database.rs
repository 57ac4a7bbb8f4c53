use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::{resource_group_from_id, segment_after};
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::SqlService;
use crate::types::{self, SqlDatabaseParams};

const KIND: &str = "SqlDatabase";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlDatabaseAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_group: Option<String>,
    pub location: Option<String>,
    pub server_name: Option<String>,
    /// `Default`, `Copy`, `PointInTimeRestore`, ...
    pub create_mode: Option<String>,
    pub edition: Option<String>,
    pub collation: Option<String>,
    pub max_size_bytes: Option<u64>,
    pub requested_service_objective_name: Option<String>,
    pub elastic_pool_name: Option<String>,
    pub source_database_id: Option<String>,
    pub status: Option<String>,
}

impl Attributes for SqlDatabaseAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct SqlDatabase {
    service: Arc<dyn SqlService>,
    pub attributes: SqlDatabaseAttributes,
}

impl fmt::Debug for SqlDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlDatabase")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl SqlDatabase {
    pub fn new(service: Arc<dyn SqlService>, attributes: SqlDatabaseAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(database: &types::SqlDatabase) -> SqlDatabaseAttributes {
        let p = &database.properties;
        SqlDatabaseAttributes {
            id: Some(database.id.clone()),
            name: Some(database.name.clone()),
            resource_group: resource_group_from_id(&database.id),
            location: Some(database.location.clone()),
            server_name: segment_after(&database.id, "servers"),
            create_mode: p.create_mode.clone(),
            edition: p.edition.clone(),
            collation: p.collation.clone(),
            max_size_bytes: p.max_size_bytes,
            requested_service_objective_name: p.requested_service_objective_name.clone(),
            elastic_pool_name: p.elastic_pool_name.clone(),
            source_database_id: p.source_database_id.clone(),
            status: p.status.clone(),
        }
    }

    fn database_params(&self) -> AzureResult<SqlDatabaseParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("resource_group", &a.resource_group)
            .field("location", &a.location)
            .field("server_name", &a.server_name)
            .field("name", &a.name)
            .check()?;
        Ok(SqlDatabaseParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            server_name: require(KIND, "server_name", &a.server_name)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            create_mode: a.create_mode.clone(),
            edition: a.edition.clone(),
            collation: a.collation.clone(),
            max_size_bytes: a.max_size_bytes,
            requested_service_objective_name: a.requested_service_objective_name.clone(),
            elastic_pool_name: a.elastic_pool_name.clone(),
            source_database_id: a.source_database_id.clone(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.database_params()?;
        let database = self.service.create_or_update_database(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&database));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let server = require(KIND, "server_name", &self.attributes.server_name)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_database(rg, server, name).await
    }
}

pub struct SqlDatabases {
    service: Arc<dyn SqlService>,
    pub resource_group: Option<String>,
    pub server_name: Option<String>,
    loaded: Vec<SqlDatabase>,
}

impl SqlDatabases {
    pub fn new(service: Arc<dyn SqlService>) -> Self {
        Self {
            service,
            resource_group: None,
            server_name: None,
            loaded: Vec::new(),
        }
    }

    pub fn in_server(mut self, resource_group: impl Into<String>, server_name: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self.server_name = Some(server_name.into());
        self
    }

    pub async fn all(&mut self) -> AzureResult<&[SqlDatabase]> {
        Requires::new("SqlDatabases")
            .field("resource_group", &self.resource_group)
            .field("server_name", &self.server_name)
            .check()?;
        let rg = require("SqlDatabases", "resource_group", &self.resource_group)?;
        let server = require("SqlDatabases", "server_name", &self.server_name)?;
        let databases = self.service.list_databases(rg, server).await?;
        self.loaded = databases
            .iter()
            .map(|d| SqlDatabase::new(self.service.clone(), SqlDatabase::parse(d)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<SqlDatabase> {
        let database = self.service.get_database(resource_group, server_name, name).await?;
        Ok(SqlDatabase::new(self.service.clone(), SqlDatabase::parse(&database)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&SqlDatabase> {
        self.loaded
            .iter()
            .find(|d| d.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[SqlDatabase] {
        &self.loaded
    }

    pub async fn create(&self, attributes: SqlDatabaseAttributes) -> AzureResult<SqlDatabase> {
        let mut database = SqlDatabase::new(self.service.clone(), attributes);
        database.save().await?;
        Ok(database)
    }

    pub async fn check_database_exists(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<bool> {
        self.service
            .check_database_exists(resource_group, server_name, name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockSqlService;
    use crate::types::SqlDatabaseProperties;
    use azrm_core::AzureErrorKind;

    fn wire(name: &str) -> types::SqlDatabase {
        types::SqlDatabase {
            id: format!("/subscriptions/s/resourceGroups/sql-rg/providers/Microsoft.Sql/servers/fog-sql/databases/{name}"),
            name: name.into(),
            location: "eastus".into(),
            properties: SqlDatabaseProperties {
                edition: Some("Standard".into()),
                collation: Some("SQL_Latin1_General_CP1_CI_AS".into()),
                max_size_bytes: Some(268_435_456_000),
                requested_service_objective_name: Some("S0".into()),
                status: Some("Online".into()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn parse_derives_server_name() {
        let a = SqlDatabase::parse(&wire("fog-db"));
        assert_eq!(a.server_name.as_deref(), Some("fog-sql"));
        assert_eq!(a.resource_group.as_deref(), Some("sql-rg"));
        assert_eq!(a.max_size_bytes, Some(268_435_456_000));
        assert_eq!(a.status.as_deref(), Some("Online"));
    }

    #[tokio::test]
    async fn save_requires_server_name() {
        let mut mock = MockSqlService::new();
        mock.expect_create_or_update_database().times(0);
        let mut db = SqlDatabase::new(
            Arc::new(mock),
            SqlDatabaseAttributes {
                name: Some("fog-db".into()),
                resource_group: Some("sql-rg".into()),
                location: Some("eastus".into()),
                ..Default::default()
            },
        );
        let err = db.save().await.unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::MissingAttribute);
        assert!(err.message.ends_with("server_name"));
    }

    #[tokio::test]
    async fn save_passes_optional_settings() {
        let mut mock = MockSqlService::new();
        mock.expect_create_or_update_database()
            .withf(|p: &SqlDatabaseParams| {
                p.server_name == "fog-sql"
                    && p.edition.as_deref() == Some("Standard")
                    && p.requested_service_objective_name.as_deref() == Some("S0")
                    && p.elastic_pool_name.is_none()
            })
            .times(1)
            .returning(|p| Ok(wire(&p.name)));
        let mut db = SqlDatabase::new(
            Arc::new(mock),
            SqlDatabaseAttributes {
                name: Some("fog-db".into()),
                resource_group: Some("sql-rg".into()),
                location: Some("eastus".into()),
                server_name: Some("fog-sql".into()),
                edition: Some("Standard".into()),
                requested_service_objective_name: Some("S0".into()),
                ..Default::default()
            },
        );
        db.save().await.unwrap();
        assert_eq!(db.attributes.collation.as_deref(), Some("SQL_Latin1_General_CP1_CI_AS"));
    }

    #[tokio::test]
    async fn collection_needs_full_scope() {
        let mut mock = MockSqlService::new();
        mock.expect_list_databases()
            .withf(|rg: &str, server: &str| rg == "sql-rg" && server == "fog-sql")
            .times(1)
            .returning(|_, _| Ok(vec![wire("a"), wire("b")]));
        mock.expect_delete_database()
            .withf(|_: &str, _: &str, name: &str| name == "b")
            .times(1)
            .returning(|_, _, _| Ok(true));
        let service: Arc<dyn SqlService> = Arc::new(mock);

        let mut unscoped = SqlDatabases::new(service.clone());
        unscoped.resource_group = Some("sql-rg".into());
        let err = unscoped.all().await.unwrap_err();
        assert!(err.message.ends_with("server_name"));

        let mut scoped = SqlDatabases::new(service).in_server("sql-rg", "fog-sql");
        assert_eq!(scoped.all().await.unwrap().len(), 2);
        assert!(scoped.find_loaded("b").unwrap().destroy().await.unwrap());
    }
}
