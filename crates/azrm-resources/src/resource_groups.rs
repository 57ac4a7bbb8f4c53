//! Azure Resource Groups – list, get, create, delete, existence check.

use log::debug;

use azrm_core::{AzureClient, AzureResult};

use crate::types::{CreateResourceGroupRequest, ResourceGroup};

fn rg_url(client: &AzureClient, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_resources;
    client.subscription_url(&format!("/resourcegroups/{}?api-version={}", name, api))
}

/// List all resource groups in the subscription.
pub async fn list_resource_groups(client: &AzureClient) -> AzureResult<Vec<ResourceGroup>> {
    let api = &client.config().api_version_resources;
    let url = client.subscription_url(&format!("/resourcegroups?api-version={}", api))?;
    debug!("list_resource_groups → {}", url);
    client.get_all_pages(&url).await
}

pub async fn get_resource_group(client: &AzureClient, name: &str) -> AzureResult<ResourceGroup> {
    let url = rg_url(client, name)?;
    debug!("get_resource_group({}) → {}", name, url);
    client.get_json(&url).await
}

/// Create or update a resource group.
pub async fn create_resource_group(
    client: &AzureClient,
    name: &str,
    request: &CreateResourceGroupRequest,
) -> AzureResult<ResourceGroup> {
    let url = rg_url(client, name)?;
    debug!("create_resource_group({}) → {}", name, url);
    client.put_json(&url, request).await
}

/// Delete a resource group (and all its resources).
pub async fn delete_resource_group(client: &AzureClient, name: &str) -> AzureResult<()> {
    let url = rg_url(client, name)?;
    debug!("delete_resource_group({}) → {}", name, url);
    client.delete(&url).await
}

pub async fn check_resource_group_exists(client: &AzureClient, name: &str) -> AzureResult<bool> {
    let url = rg_url(client, name)?;
    debug!("check_resource_group_exists({}) → {}", name, url);
    client.exists(&url).await
}
