//! Storage accounts on the management plane: list, get, create, update,
//! delete, list keys, check name availability.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureResult};

use crate::types::{
    NameAvailability, StorageAccount, StorageAccountKey, StorageAccountParams,
    StorageAccountUpdateParams, StorageKeyList,
};

/// Account kind used for new accounts.
const ACCOUNT_KIND: &str = "Storage";

fn account_url(client: &AzureClient, resource_group: &str, name: &str, suffix: &str) -> AzureResult<String> {
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Storage/storageAccounts/{}{}?api-version={}",
            name,
            suffix,
            client.config().api_version_storage
        ),
    )
}

/// List all storage accounts in the subscription.
pub async fn list_storage_accounts(client: &AzureClient) -> AzureResult<Vec<StorageAccount>> {
    let url = client.subscription_url(&format!(
        "/providers/Microsoft.Storage/storageAccounts?api-version={}",
        client.config().api_version_storage
    ))?;
    debug!("list_storage_accounts → {}", url);
    client.get_all_pages(&url).await
}

/// List storage accounts in a resource group.
pub async fn list_storage_accounts_in_rg(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<StorageAccount>> {
    let url = client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Storage/storageAccounts?api-version={}",
            client.config().api_version_storage
        ),
    )?;
    debug!("list_storage_accounts_in_rg({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_storage_account(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<StorageAccount> {
    let url = account_url(client, resource_group, name, "")?;
    debug!("get_storage_account({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn check_storage_account_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = account_url(client, resource_group, name, "")?;
    debug!("check_storage_account_exists({}/{}) → {}", resource_group, name, url);
    client.exists(&url).await
}

/// Subscription-wide check that `name` is still free.
pub async fn check_name_availability(client: &AzureClient, name: &str) -> AzureResult<NameAvailability> {
    let url = client.subscription_url(&format!(
        "/providers/Microsoft.Storage/checkNameAvailability?api-version={}",
        client.config().api_version_storage
    ))?;
    debug!("check_name_availability({}) → {}", name, url);
    let body = json!({ "name": name, "type": "Microsoft.Storage/storageAccounts" });
    client.post_json(&url, &body).await
}

pub(crate) fn encryption_body(enabled: bool) -> Value {
    json!({
        "services": { "blob": { "enabled": enabled } },
        "keySource": "Microsoft.Storage"
    })
}

pub(crate) fn storage_account_body(params: &StorageAccountParams) -> Value {
    let mut properties = json!({});
    if let Some(enabled) = params.encryption {
        properties["encryption"] = encryption_body(enabled);
    }
    json!({
        "location": params.location,
        "kind": ACCOUNT_KIND,
        "sku": { "name": params.sku_name },
        "tags": params.tags,
        "properties": properties,
    })
}

pub async fn create_storage_account(
    client: &AzureClient,
    params: &StorageAccountParams,
) -> AzureResult<StorageAccount> {
    let url = account_url(client, &params.resource_group, &params.name, "")?;
    debug!("create_storage_account({}/{}) → {}", params.resource_group, params.name, url);
    client.put_json(&url, &storage_account_body(params)).await
}

pub(crate) fn storage_account_update_body(params: &StorageAccountUpdateParams) -> Value {
    let mut body = json!({ "sku": { "name": params.sku_name } });
    if let Some(enabled) = params.encryption {
        body["properties"] = json!({ "encryption": encryption_body(enabled) });
    }
    body
}

pub async fn update_storage_account(
    client: &AzureClient,
    params: &StorageAccountUpdateParams,
) -> AzureResult<StorageAccount> {
    let url = account_url(client, &params.resource_group, &params.name, "")?;
    debug!("update_storage_account({}/{}) → {}", params.resource_group, params.name, url);
    client.patch_json(&url, &storage_account_update_body(params)).await
}

pub async fn delete_storage_account(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<()> {
    let url = account_url(client, resource_group, name, "")?;
    debug!("delete_storage_account({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}

/// List storage account access keys.
pub async fn list_keys(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<Vec<StorageAccountKey>> {
    let url = account_url(client, resource_group, name, "/listKeys")?;
    debug!("list_keys({}/{}) → {}", resource_group, name, url);
    let resp: StorageKeyList = client.post_json(&url, &json!({})).await?;
    Ok(resp.keys)
}
