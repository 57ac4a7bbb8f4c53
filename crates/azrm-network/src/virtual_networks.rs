//! Azure Virtual Networks – list, get, create or update, delete, and the
//! read-modify-write helpers for DNS servers, address prefixes and subnets.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureError, AzureErrorKind, AzureResult};

use crate::types::{SubnetSpec, VirtualNetwork, VirtualNetworkParams};

pub(crate) fn vnet_url(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_network;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Network/virtualNetworks/{}?api-version={}",
            name, api
        ),
    )
}

pub async fn list_virtual_networks(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<VirtualNetwork>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Network/virtualNetworks?api-version={}", api),
    )?;
    debug!("list_virtual_networks({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<VirtualNetwork> {
    let url = vnet_url(client, resource_group, name)?;
    debug!("get_virtual_network({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn check_virtual_network_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = vnet_url(client, resource_group, name)?;
    debug!("check_virtual_network_exists({}/{}) → {}", resource_group, name, url);
    client.exists(&url).await
}

pub async fn delete_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<()> {
    let url = vnet_url(client, resource_group, name)?;
    debug!("delete_virtual_network({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}

pub(crate) fn subnet_body(spec: &SubnetSpec) -> Value {
    let mut properties = json!({ "addressPrefix": spec.address_prefix });
    if let Some(nsg) = &spec.network_security_group_id {
        properties["networkSecurityGroup"] = json!({ "id": nsg });
    }
    if let Some(rt) = &spec.route_table_id {
        properties["routeTable"] = json!({ "id": rt });
    }
    json!({ "name": spec.name, "properties": properties })
}

const DEFAULT_ADDRESS_PREFIX: &str = "10.2.0.0/16";

/// An empty prefix list falls back to `10.2.0.0/16`.
pub fn virtual_network_body(params: &VirtualNetworkParams) -> Value {
    let prefixes = if params.address_prefixes.is_empty() {
        vec![DEFAULT_ADDRESS_PREFIX.to_string()]
    } else {
        params.address_prefixes.clone()
    };
    let mut properties = json!({
        "addressSpace": { "addressPrefixes": prefixes },
        "subnets": params.subnets.iter().map(subnet_body).collect::<Vec<_>>(),
    });
    if !params.dns_servers.is_empty() {
        properties["dhcpOptions"] = json!({ "dnsServers": params.dns_servers });
    }
    json!({
        "location": params.location,
        "tags": params.tags,
        "properties": properties,
    })
}

pub async fn create_or_update_virtual_network(
    client: &AzureClient,
    params: &VirtualNetworkParams,
) -> AzureResult<VirtualNetwork> {
    let url = vnet_url(client, &params.resource_group, &params.name)?;
    debug!(
        "create_or_update_virtual_network({}/{}) → {}",
        params.resource_group, params.name, url
    );
    client.put_json(&url, &virtual_network_body(params)).await
}

/// Raw GET → mutate → PUT, keeping every field ARM returned.
async fn modify_virtual_network<F>(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    mutate: F,
) -> AzureResult<VirtualNetwork>
where
    F: FnOnce(&mut Value) -> AzureResult<()>,
{
    let url = vnet_url(client, resource_group, name)?;
    let mut body: Value = client.get_json(&url).await?;
    mutate(&mut body)?;
    client.put_json(&url, &body).await
}

fn properties_mut(body: &mut Value) -> AzureResult<&mut serde_json::Map<String, Value>> {
    body.get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| AzureError::new(AzureErrorKind::Parse, "virtual network payload has no properties"))
}

/// Returns the string array at `properties.<outer>.<inner>`, creating it if absent.
fn string_list<'a>(body: &'a mut Value, outer: &str, inner: &str) -> AzureResult<&'a mut Vec<Value>> {
    let props = properties_mut(body)?;
    let section = props
        .entry(outer.to_string())
        .or_insert_with(|| json!({}));
    if !section.is_object() {
        *section = json!({});
    }
    let list = section
        .as_object_mut()
        .map(|s| s.entry(inner.to_string()).or_insert_with(|| json!([])))
        .ok_or_else(|| AzureError::new(AzureErrorKind::Parse, format!("{} is not an object", outer)))?;
    if !list.is_array() {
        *list = json!([]);
    }
    list.as_array_mut()
        .ok_or_else(|| AzureError::new(AzureErrorKind::Parse, format!("{}.{} is not an array", outer, inner)))
}

fn add_unique(list: &mut Vec<Value>, values: &[String]) {
    for v in values {
        if !list.iter().any(|x| x.as_str() == Some(v.as_str())) {
            list.push(Value::String(v.clone()));
        }
    }
}

fn remove_all(list: &mut Vec<Value>, values: &[String]) {
    list.retain(|x| !values.iter().any(|v| x.as_str() == Some(v.as_str())));
}

pub async fn add_dns_servers_in_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    dns_servers: &[String],
) -> AzureResult<VirtualNetwork> {
    debug!("add_dns_servers_in_virtual_network({}/{}) {:?}", resource_group, name, dns_servers);
    modify_virtual_network(client, resource_group, name, |body| {
        add_unique(string_list(body, "dhcpOptions", "dnsServers")?, dns_servers);
        Ok(())
    })
    .await
}

pub async fn remove_dns_servers_from_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    dns_servers: &[String],
) -> AzureResult<VirtualNetwork> {
    debug!("remove_dns_servers_from_virtual_network({}/{}) {:?}", resource_group, name, dns_servers);
    modify_virtual_network(client, resource_group, name, |body| {
        remove_all(string_list(body, "dhcpOptions", "dnsServers")?, dns_servers);
        Ok(())
    })
    .await
}

pub async fn add_address_prefixes_in_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    prefixes: &[String],
) -> AzureResult<VirtualNetwork> {
    debug!("add_address_prefixes_in_virtual_network({}/{}) {:?}", resource_group, name, prefixes);
    modify_virtual_network(client, resource_group, name, |body| {
        add_unique(string_list(body, "addressSpace", "addressPrefixes")?, prefixes);
        Ok(())
    })
    .await
}

pub async fn remove_address_prefixes_from_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    prefixes: &[String],
) -> AzureResult<VirtualNetwork> {
    debug!("remove_address_prefixes_from_virtual_network({}/{}) {:?}", resource_group, name, prefixes);
    modify_virtual_network(client, resource_group, name, |body| {
        remove_all(string_list(body, "addressSpace", "addressPrefixes")?, prefixes);
        Ok(())
    })
    .await
}

fn subnet_list(body: &mut Value) -> AzureResult<&mut Vec<Value>> {
    let props = properties_mut(body)?;
    let list = props.entry("subnets".to_string()).or_insert_with(|| json!([]));
    if !list.is_array() {
        *list = json!([]);
    }
    list.as_array_mut()
        .ok_or_else(|| AzureError::new(AzureErrorKind::Parse, "subnets is not an array"))
}

/// Subnets whose name already exists are replaced.
pub async fn add_subnets_in_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    subnets: &[SubnetSpec],
) -> AzureResult<VirtualNetwork> {
    debug!("add_subnets_in_virtual_network({}/{}) {} subnet(s)", resource_group, name, subnets.len());
    modify_virtual_network(client, resource_group, name, |body| {
        let list = subnet_list(body)?;
        for spec in subnets {
            list.retain(|s| s["name"].as_str() != Some(spec.name.as_str()));
            list.push(subnet_body(spec));
        }
        Ok(())
    })
    .await
}

pub async fn remove_subnets_from_virtual_network(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    subnet_names: &[String],
) -> AzureResult<VirtualNetwork> {
    debug!("remove_subnets_from_virtual_network({}/{}) {:?}", resource_group, name, subnet_names);
    modify_virtual_network(client, resource_group, name, |body| {
        let list = subnet_list(body)?;
        list.retain(|s| {
            !subnet_names
                .iter()
                .any(|n| s["name"].as_str() == Some(n.as_str()))
        });
        Ok(())
    })
    .await
}
