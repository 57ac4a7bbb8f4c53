//! Azure Network Interfaces – CRUD plus attaching and detaching the subnet,
//! public IP and security group of the primary IP configuration.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureError, AzureErrorKind, AzureResult};

use crate::subnets::set_reference;
use crate::types::{NetworkInterface, NetworkInterfaceParams, NicResource};

fn nic_url(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_network;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Network/networkInterfaces/{}?api-version={}",
            name, api
        ),
    )
}

pub async fn list_network_interfaces(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<NetworkInterface>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Network/networkInterfaces?api-version={}", api),
    )?;
    debug!("list_network_interfaces({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_network_interface(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<NetworkInterface> {
    let url = nic_url(client, resource_group, name)?;
    debug!("get_network_interface({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn check_network_interface_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = nic_url(client, resource_group, name)?;
    client.exists(&url).await
}

pub fn network_interface_body(params: &NetworkInterfaceParams) -> Value {
    let mut ip_props = json!({
        "privateIPAllocationMethod": params.private_ip_allocation_method,
        "subnet": { "id": params.subnet_id },
    });
    if let Some(address) = &params.private_ip_address {
        ip_props["privateIPAddress"] = json!(address);
    }
    if let Some(pip) = &params.public_ip_address_id {
        ip_props["publicIPAddress"] = json!({ "id": pip });
    }
    if !params.load_balancer_backend_address_pools_ids.is_empty() {
        ip_props["loadBalancerBackendAddressPools"] = params
            .load_balancer_backend_address_pools_ids
            .iter()
            .map(|id| json!({ "id": id }))
            .collect();
    }
    if !params.load_balancer_inbound_nat_rules_ids.is_empty() {
        ip_props["loadBalancerInboundNatRules"] = params
            .load_balancer_inbound_nat_rules_ids
            .iter()
            .map(|id| json!({ "id": id }))
            .collect();
    }
    let mut properties = json!({
        "ipConfigurations": [{ "name": params.ip_configuration_name, "properties": ip_props }],
    });
    if let Some(nsg) = &params.network_security_group_id {
        properties["networkSecurityGroup"] = json!({ "id": nsg });
    }
    json!({ "location": params.location, "properties": properties })
}

pub async fn create_or_update_network_interface(
    client: &AzureClient,
    params: &NetworkInterfaceParams,
) -> AzureResult<NetworkInterface> {
    let url = nic_url(client, &params.resource_group, &params.name)?;
    debug!(
        "create_or_update_network_interface({}/{}) → {}",
        params.resource_group, params.name, url
    );
    client.put_json(&url, &network_interface_body(params)).await
}

pub async fn delete_network_interface(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<()> {
    let url = nic_url(client, resource_group, name)?;
    debug!("delete_network_interface({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}

fn primary_ip_configuration(body: &mut Value) -> AzureResult<&mut Value> {
    body.pointer_mut("/properties/ipConfigurations/0")
        .filter(|v| v.is_object())
        .ok_or_else(|| {
            AzureError::new(AzureErrorKind::Parse, "network interface has no IP configuration")
        })
}

/// Applies an attach (`Some(id)`) or detach (`None`) to a raw NIC payload.
pub(crate) fn apply_nic_resource(body: &mut Value, resource: NicResource, id: Option<&str>) -> AzureResult<()> {
    match resource {
        NicResource::Subnet => {
            if id.is_none() {
                return Err(AzureError::new(
                    AzureErrorKind::Validation,
                    "a network interface cannot be detached from its subnet",
                ));
            }
            set_reference(primary_ip_configuration(body)?, "subnet", id)
        }
        NicResource::PublicIp => set_reference(primary_ip_configuration(body)?, "publicIPAddress", id),
        NicResource::NetworkSecurityGroup => set_reference(body, "networkSecurityGroup", id),
    }
}

pub async fn attach_resource_to_nic(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    resource: NicResource,
    resource_id: &str,
) -> AzureResult<NetworkInterface> {
    let url = nic_url(client, resource_group, name)?;
    debug!("attach_resource_to_nic({}/{}) {:?} {}", resource_group, name, resource, resource_id);
    let mut body: Value = client.get_json(&url).await?;
    apply_nic_resource(&mut body, resource, Some(resource_id))?;
    client.put_json(&url, &body).await
}

pub async fn detach_resource_from_nic(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    resource: NicResource,
) -> AzureResult<NetworkInterface> {
    let url = nic_url(client, resource_group, name)?;
    debug!("detach_resource_from_nic({}/{}) {:?}", resource_group, name, resource);
    let mut body: Value = client.get_json(&url).await?;
    apply_nic_resource(&mut body, resource, None)?;
    client.put_json(&url, &body).await
}
