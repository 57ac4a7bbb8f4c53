//! SQL logical servers.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureResult};

use crate::types::{SqlServer, SqlServerParams};

pub(crate) fn server_url(client: &AzureClient, rg: &str, server_name: &str, suffix: &str) -> AzureResult<String> {
    client.resource_group_url(
        rg,
        &format!(
            "/providers/Microsoft.Sql/servers/{}{}?api-version={}",
            server_name,
            suffix,
            client.config().api_version_sql
        ),
    )
}

pub async fn list_sql_servers(client: &AzureClient, rg: &str) -> AzureResult<Vec<SqlServer>> {
    let url = client.resource_group_url(
        rg,
        &format!("/providers/Microsoft.Sql/servers?api-version={}", client.config().api_version_sql),
    )?;
    debug!("list_sql_servers({}) → {}", rg, url);
    client.get_all_pages(&url).await
}

pub async fn get_sql_server(client: &AzureClient, rg: &str, server_name: &str) -> AzureResult<SqlServer> {
    let url = server_url(client, rg, server_name, "")?;
    debug!("get_sql_server({}/{}) → {}", rg, server_name, url);
    client.get_json(&url).await
}

pub async fn check_sql_server_exists(client: &AzureClient, rg: &str, server_name: &str) -> AzureResult<bool> {
    let url = server_url(client, rg, server_name, "")?;
    debug!("check_sql_server_exists({}/{}) → {}", rg, server_name, url);
    client.exists(&url).await
}

pub(crate) fn sql_server_body(params: &SqlServerParams) -> Value {
    json!({
        "location": params.location,
        "properties": {
            "version": params.version,
            "administratorLogin": params.administrator_login,
            "administratorLoginPassword": params.administrator_login_password,
        }
    })
}

pub async fn create_or_update_sql_server(client: &AzureClient, params: &SqlServerParams) -> AzureResult<SqlServer> {
    let url = server_url(client, &params.resource_group, &params.name, "")?;
    debug!("create_or_update_sql_server({}/{}) → {}", params.resource_group, params.name, url);
    client.put_json(&url, &sql_server_body(params)).await
}

pub async fn delete_sql_server(client: &AzureClient, rg: &str, server_name: &str) -> AzureResult<()> {
    let url = server_url(client, rg, server_name, "")?;
    debug!("delete_sql_server({}/{}) → {}", rg, server_name, url);
    client.delete(&url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_credentials() {
        let body = sql_server_body(&SqlServerParams {
            resource_group: "rg".into(),
            name: "srv".into(),
            location: "eastus".into(),
            version: "12.0".into(),
            administrator_login: "admin1".into(),
            administrator_login_password: "P@ssw0rd!".into(),
        });
        assert_eq!(body["properties"]["administratorLoginPassword"], "P@ssw0rd!");
        assert_eq!(body["properties"]["version"], "12.0");
        assert_eq!(body["location"], "eastus");
    }
}
