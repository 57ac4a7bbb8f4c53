//! Azure Local Network Gateways.

use log::debug;
use serde_json::json;

use azrm_core::{AzureClient, AzureResult};

use crate::types::{BgpSettings, LocalNetworkGateway, LocalNetworkGatewayParams};

fn gateway_url(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_network;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Network/localNetworkGateways/{}?api-version={}",
            name, api
        ),
    )
}

pub async fn list_local_network_gateways(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<LocalNetworkGateway>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Network/localNetworkGateways?api-version={}", api),
    )?;
    debug!("list_local_network_gateways({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_local_network_gateway(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<LocalNetworkGateway> {
    let url = gateway_url(client, resource_group, name)?;
    debug!("get_local_network_gateway({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn check_local_network_gateway_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = gateway_url(client, resource_group, name)?;
    client.exists(&url).await
}

pub async fn create_or_update_local_network_gateway(
    client: &AzureClient,
    params: &LocalNetworkGatewayParams,
) -> AzureResult<LocalNetworkGateway> {
    let url = gateway_url(client, &params.resource_group, &params.name)?;
    debug!(
        "create_or_update_local_network_gateway({}/{}) → {}",
        params.resource_group, params.name, url
    );
    let mut properties = json!({
        "gatewayIpAddress": params.gateway_ip_address,
        "localNetworkAddressSpace": { "addressPrefixes": params.address_prefixes },
    });
    if params.asn.is_some() || params.bgp_peering_address.is_some() || params.peer_weight.is_some() {
        let bgp = BgpSettings {
            asn: params.asn,
            bgp_peering_address: params.bgp_peering_address.clone(),
            peer_weight: params.peer_weight,
        };
        properties["bgpSettings"] = json!(bgp);
    }
    let body = json!({
        "location": params.location,
        "tags": params.tags,
        "properties": properties,
    });
    client.put_json(&url, &body).await
}

pub async fn delete_local_network_gateway(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<()> {
    let url = gateway_url(client, resource_group, name)?;
    debug!("delete_local_network_gateway({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}
