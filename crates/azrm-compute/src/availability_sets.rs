//! Azure Availability Sets – list, get, create, delete.

use log::debug;
use serde_json::json;

use azrm_core::{AzureClient, AzureResult};

use crate::types::{AvailabilitySet, AvailabilitySetParams};

fn availability_set_url(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_compute;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Compute/availabilitySets/{}?api-version={}",
            name, api
        ),
    )
}

pub async fn list_availability_sets(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<AvailabilitySet>> {
    let api = &client.config().api_version_compute;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Compute/availabilitySets?api-version={}", api),
    )?;
    debug!("list_availability_sets({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_availability_set(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<AvailabilitySet> {
    let url = availability_set_url(client, resource_group, name)?;
    debug!("get_availability_set({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn create_availability_set(
    client: &AzureClient,
    params: &AvailabilitySetParams,
) -> AzureResult<AvailabilitySet> {
    let url = availability_set_url(client, &params.resource_group, &params.name)?;
    debug!("create_availability_set({}/{}) → {}", params.resource_group, params.name, url);
    let sku = if params.use_managed_disk { "Aligned" } else { "Classic" };
    let body = json!({
        "location": params.location,
        "tags": params.tags,
        "sku": { "name": sku },
        "properties": {
            "platformUpdateDomainCount": params.platform_update_domain_count,
            "platformFaultDomainCount": params.platform_fault_domain_count,
        }
    });
    client.put_json(&url, &body).await
}

pub async fn delete_availability_set(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<()> {
    let url = availability_set_url(client, resource_group, name)?;
    debug!("delete_availability_set({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}

pub async fn check_availability_set_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = availability_set_url(client, resource_group, name)?;
    client.exists(&url).await
}
