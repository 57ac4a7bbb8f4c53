//! Azure Subnets – child resources of a virtual network.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureError, AzureErrorKind, AzureResult};

use crate::types::{Subnet, SubnetParams};

fn subnets_path(virtual_network: &str) -> String {
    format!("/providers/Microsoft.Network/virtualNetworks/{}/subnets", virtual_network)
}

fn subnet_url(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
) -> AzureResult<String> {
    let api = &client.config().api_version_network;
    client.resource_group_url(
        resource_group,
        &format!("{}/{}?api-version={}", subnets_path(virtual_network), name, api),
    )
}

pub async fn list_subnets(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
) -> AzureResult<Vec<Subnet>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        resource_group,
        &format!("{}?api-version={}", subnets_path(virtual_network), api),
    )?;
    debug!("list_subnets({}/{}) → {}", resource_group, virtual_network, url);
    client.get_all_pages(&url).await
}

pub async fn get_subnet(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
) -> AzureResult<Subnet> {
    let url = subnet_url(client, resource_group, virtual_network, name)?;
    debug!("get_subnet({}/{}/{}) → {}", resource_group, virtual_network, name, url);
    client.get_json(&url).await
}

pub async fn check_subnet_exists(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = subnet_url(client, resource_group, virtual_network, name)?;
    client.exists(&url).await
}

pub async fn create_subnet(client: &AzureClient, params: &SubnetParams) -> AzureResult<Subnet> {
    let url = subnet_url(
        client,
        &params.resource_group,
        &params.virtual_network_name,
        &params.name,
    )?;
    debug!(
        "create_subnet({}/{}/{}) → {}",
        params.resource_group, params.virtual_network_name, params.name, url
    );
    let mut properties = json!({ "addressPrefix": params.address_prefix });
    if let Some(nsg) = &params.network_security_group_id {
        properties["networkSecurityGroup"] = json!({ "id": nsg });
    }
    if let Some(rt) = &params.route_table_id {
        properties["routeTable"] = json!({ "id": rt });
    }
    client.put_json(&url, &json!({ "properties": properties })).await
}

pub async fn delete_subnet(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
) -> AzureResult<()> {
    let url = subnet_url(client, resource_group, virtual_network, name)?;
    debug!("delete_subnet({}/{}/{}) → {}", resource_group, virtual_network, name, url);
    client.delete(&url).await
}

/// Sets (`Some`) or clears (`None`) `properties.<key>` on the subnet.
async fn set_subnet_reference(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
    key: &str,
    id: Option<&str>,
) -> AzureResult<Subnet> {
    let url = subnet_url(client, resource_group, virtual_network, name)?;
    debug!("set_subnet_reference({}/{}/{}) {} = {:?}", resource_group, virtual_network, name, key, id);
    let mut body: Value = client.get_json(&url).await?;
    set_reference(&mut body, key, id)?;
    client.put_json(&url, &body).await
}

pub(crate) fn set_reference(body: &mut Value, key: &str, id: Option<&str>) -> AzureResult<()> {
    let props = body
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| AzureError::new(AzureErrorKind::Parse, "payload has no properties"))?;
    match id {
        Some(id) => {
            props.insert(key.to_string(), json!({ "id": id }));
        }
        None => {
            props.remove(key);
        }
    }
    Ok(())
}

pub async fn attach_network_security_group_to_subnet(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
    network_security_group_id: &str,
) -> AzureResult<Subnet> {
    set_subnet_reference(
        client,
        resource_group,
        virtual_network,
        name,
        "networkSecurityGroup",
        Some(network_security_group_id),
    )
    .await
}

pub async fn detach_network_security_group_from_subnet(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
) -> AzureResult<Subnet> {
    set_subnet_reference(client, resource_group, virtual_network, name, "networkSecurityGroup", None).await
}

pub async fn attach_route_table_to_subnet(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
    route_table_id: &str,
) -> AzureResult<Subnet> {
    set_subnet_reference(client, resource_group, virtual_network, name, "routeTable", Some(route_table_id))
        .await
}

pub async fn detach_route_table_from_subnet(
    client: &AzureClient,
    resource_group: &str,
    virtual_network: &str,
    name: &str,
) -> AzureResult<Subnet> {
    set_subnet_reference(client, resource_group, virtual_network, name, "routeTable", None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_reference() {
        let mut body = json!({ "name": "web", "properties": { "addressPrefix": "10.0.0.0/24" } });
        set_reference(&mut body, "routeTable", Some("rt-id")).unwrap();
        assert_eq!(body["properties"]["routeTable"]["id"], "rt-id");
        set_reference(&mut body, "routeTable", None).unwrap();
        assert!(body["properties"].get("routeTable").is_none());
        assert_eq!(body["properties"]["addressPrefix"], "10.0.0.0/24");
    }

    #[test]
    fn set_reference_without_properties_fails() {
        let mut body = json!({ "name": "web" });
        assert!(set_reference(&mut body, "routeTable", Some("rt")).is_err());
    }
}
