//! DNS zones.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureResult};

use crate::types::{Zone, ZoneParams};

pub(crate) fn zone_url(client: &AzureClient, rg: &str, zone_name: &str, suffix: &str) -> AzureResult<String> {
    client.resource_group_url(
        rg,
        &format!(
            "/providers/Microsoft.Network/dnsZones/{}{}?api-version={}",
            zone_name,
            suffix,
            client.config().api_version_dns
        ),
    )
}

/// Every zone in the subscription.
pub async fn list_zones(client: &AzureClient) -> AzureResult<Vec<Zone>> {
    let url = client.subscription_url(&format!(
        "/providers/Microsoft.Network/dnszones?api-version={}",
        client.config().api_version_dns
    ))?;
    debug!("list_zones → {}", url);
    client.get_all_pages(&url).await
}

pub async fn get_zone(client: &AzureClient, rg: &str, name: &str) -> AzureResult<Zone> {
    let url = zone_url(client, rg, name, "")?;
    debug!("get_zone({}/{}) → {}", rg, name, url);
    client.get_json(&url).await
}

pub async fn check_zone_exists(client: &AzureClient, rg: &str, name: &str) -> AzureResult<bool> {
    let url = zone_url(client, rg, name, "")?;
    debug!("check_zone_exists({}/{}) → {}", rg, name, url);
    client.exists(&url).await
}

pub(crate) fn zone_body(params: &ZoneParams) -> Value {
    json!({
        "location": params.location,
        "tags": params.tags,
    })
}

pub async fn create_or_update_zone(client: &AzureClient, params: &ZoneParams) -> AzureResult<Zone> {
    let url = zone_url(client, &params.resource_group, &params.name, "")?;
    debug!("create_or_update_zone({}/{}) → {}", params.resource_group, params.name, url);
    client.put_json(&url, &zone_body(params)).await
}

pub async fn delete_zone(client: &AzureClient, rg: &str, name: &str) -> AzureResult<()> {
    let url = zone_url(client, rg, name, "")?;
    debug!("delete_zone({}/{}) → {}", rg, name, url);
    client.delete(&url).await
}
