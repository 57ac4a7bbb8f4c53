//! Azure Public IP addresses.

use log::debug;
use serde_json::json;

use azrm_core::{AzureClient, AzureResult};

use crate::types::{PublicIpAddress, PublicIpParams};

fn public_ip_url(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_network;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Network/publicIPAddresses/{}?api-version={}",
            name, api
        ),
    )
}

pub async fn list_public_ips(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<PublicIpAddress>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Network/publicIPAddresses?api-version={}", api),
    )?;
    debug!("list_public_ips({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_public_ip(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<PublicIpAddress> {
    let url = public_ip_url(client, resource_group, name)?;
    debug!("get_public_ip({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn check_public_ip_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = public_ip_url(client, resource_group, name)?;
    client.exists(&url).await
}

pub async fn create_or_update_public_ip(
    client: &AzureClient,
    params: &PublicIpParams,
) -> AzureResult<PublicIpAddress> {
    let url = public_ip_url(client, &params.resource_group, &params.name)?;
    debug!("create_or_update_public_ip({}/{}) → {}", params.resource_group, params.name, url);
    let mut properties = json!({
        "publicIPAllocationMethod": params.public_ip_allocation_method,
    });
    if let Some(timeout) = params.idle_timeout_in_minutes {
        properties["idleTimeoutInMinutes"] = json!(timeout);
    }
    if let Some(label) = &params.domain_name_label {
        properties["dnsSettings"] = json!({ "domainNameLabel": label });
    }
    let body = json!({ "location": params.location, "properties": properties });
    client.put_json(&url, &body).await
}

pub async fn delete_public_ip(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<()> {
    let url = public_ip_url(client, resource_group, name)?;
    debug!("delete_public_ip({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}
