//! Databases of a SQL server.

use log::debug;
use serde_json::{json, Map, Value};

use azrm_core::{AzureClient, AzureResult};

use crate::servers::server_url;
use crate::types::{SqlDatabase, SqlDatabaseParams};

fn database_url(client: &AzureClient, rg: &str, server_name: &str, name: &str) -> AzureResult<String> {
    server_url(client, rg, server_name, &format!("/databases/{}", name))
}

pub async fn list_databases(client: &AzureClient, rg: &str, server_name: &str) -> AzureResult<Vec<SqlDatabase>> {
    let url = server_url(client, rg, server_name, "/databases")?;
    debug!("list_databases({}/{}) → {}", rg, server_name, url);
    client.get_all_pages(&url).await
}

pub async fn get_database(client: &AzureClient, rg: &str, server_name: &str, name: &str) -> AzureResult<SqlDatabase> {
    let url = database_url(client, rg, server_name, name)?;
    debug!("get_database({}/{}/{}) → {}", rg, server_name, name, url);
    client.get_json(&url).await
}

pub async fn check_database_exists(client: &AzureClient, rg: &str, server_name: &str, name: &str) -> AzureResult<bool> {
    let url = database_url(client, rg, server_name, name)?;
    debug!("check_database_exists({}/{}/{}) → {}", rg, server_name, name, url);
    client.exists(&url).await
}

/// Only the optional settings that are present end up in `properties`.
pub(crate) fn database_body(params: &SqlDatabaseParams) -> Value {
    let mut properties = Map::new();
    let optional = [
        ("createMode", &params.create_mode),
        ("edition", &params.edition),
        ("collation", &params.collation),
        ("requestedServiceObjectiveName", &params.requested_service_objective_name),
        ("elasticPoolName", &params.elastic_pool_name),
        ("sourceDatabaseId", &params.source_database_id),
    ];
    for (key, value) in optional {
        if let Some(v) = value {
            properties.insert(key.to_string(), json!(v));
        }
    }
    if let Some(max) = params.max_size_bytes {
        properties.insert("maxSizeBytes".to_string(), json!(max.to_string()));
    }
    json!({
        "location": params.location,
        "properties": properties,
    })
}

pub async fn create_or_update_database(client: &AzureClient, params: &SqlDatabaseParams) -> AzureResult<SqlDatabase> {
    let url = database_url(client, &params.resource_group, &params.server_name, &params.name)?;
    debug!(
        "create_or_update_database({}/{}/{}) → {}",
        params.resource_group, params.server_name, params.name, url
    );
    client.put_json(&url, &database_body(params)).await
}

pub async fn delete_database(client: &AzureClient, rg: &str, server_name: &str, name: &str) -> AzureResult<()> {
    let url = database_url(client, rg, server_name, name)?;
    debug!("delete_database({}/{}/{}) → {}", rg, server_name, name, url);
    client.delete(&url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_skips_unset_settings() {
        let body = database_body(&SqlDatabaseParams {
            resource_group: "rg".into(),
            server_name: "srv".into(),
            name: "db".into(),
            location: "eastus".into(),
            edition: Some("Standard".into()),
            max_size_bytes: Some(1_073_741_824),
            ..Default::default()
        });
        assert_eq!(
            body,
            json!({
                "location": "eastus",
                "properties": { "edition": "Standard", "maxSizeBytes": "1073741824" }
            })
        );
    }
}
