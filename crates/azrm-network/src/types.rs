//! Wire types for `Microsoft.Network` and the parameter structs handed to
//! the network service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use azrm_core::SubResource;

use crate::models::load_balancer_components::{
    FrontendIpConfigurationAttributes, InboundNatPoolAttributes, InboundNatRuleAttributes,
    LoadBalancingRuleAttributes, ProbeAttributes,
};
use crate::models::network_security_rule::NetworkSecurityRuleAttributes;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    #[serde(default)]
    pub address_prefixes: Vec<String>,
}

// ─── Virtual Networks ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetwork {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    pub properties: VirtualNetworkProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkProperties {
    #[serde(default)]
    pub address_space: Option<AddressSpace>,
    #[serde(default)]
    pub dhcp_options: Option<DhcpOptions>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DhcpOptions {
    #[serde(default)]
    pub dns_servers: Vec<String>,
}

// ─── Subnets ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: SubnetProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetProperties {
    #[serde(default)]
    pub address_prefix: Option<String>,
    #[serde(default)]
    pub network_security_group: Option<SubResource>,
    #[serde(default)]
    pub route_table: Option<SubResource>,
    #[serde(default)]
    pub ip_configurations: Vec<SubResource>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

// ─── Public IPs ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddress {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: PublicIpProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpProperties {
    #[serde(default, rename = "publicIPAllocationMethod")]
    pub public_ip_allocation_method: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub idle_timeout_in_minutes: Option<u32>,
    #[serde(default)]
    pub dns_settings: Option<PublicIpDnsSettings>,
    #[serde(default)]
    pub ip_configuration: Option<SubResource>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpDnsSettings {
    #[serde(default)]
    pub domain_name_label: Option<String>,
    #[serde(default)]
    pub fqdn: Option<String>,
    #[serde(default)]
    pub reverse_fqdn: Option<String>,
}

// ─── Network Interfaces ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub id: String,
    pub name: String,
    pub location: String,
    pub properties: NetworkInterfaceProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
    #[serde(default)]
    pub virtual_machine: Option<SubResource>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub network_security_group: Option<SubResource>,
    #[serde(default)]
    pub ip_configurations: Vec<NicIpConfiguration>,
    #[serde(default)]
    pub dns_settings: Option<NicDnsSettings>,
    #[serde(default, rename = "enableIPForwarding")]
    pub enable_ip_forwarding: Option<bool>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NicIpConfiguration {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: NicIpConfigurationProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NicIpConfigurationProperties {
    #[serde(default, rename = "privateIPAddress")]
    pub private_ip_address: Option<String>,
    #[serde(default, rename = "privateIPAllocationMethod")]
    pub private_ip_allocation_method: Option<String>,
    #[serde(default)]
    pub subnet: Option<SubResource>,
    #[serde(default, rename = "publicIPAddress")]
    pub public_ip_address: Option<SubResource>,
    #[serde(default)]
    pub load_balancer_backend_address_pools: Vec<SubResource>,
    #[serde(default)]
    pub load_balancer_inbound_nat_rules: Vec<SubResource>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NicDnsSettings {
    #[serde(default)]
    pub dns_servers: Vec<String>,
    #[serde(default)]
    pub applied_dns_servers: Vec<String>,
    #[serde(default)]
    pub internal_dns_name_label: Option<String>,
    #[serde(default)]
    pub internal_fqdn: Option<String>,
}

// ─── Load Balancers ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: LoadBalancerProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerProperties {
    #[serde(default, rename = "frontendIPConfigurations")]
    pub frontend_ip_configurations: Vec<FrontendIpConfiguration>,
    #[serde(default)]
    pub backend_address_pools: Vec<BackendAddressPool>,
    #[serde(default)]
    pub load_balancing_rules: Vec<LoadBalancingRule>,
    #[serde(default)]
    pub probes: Vec<Probe>,
    #[serde(default)]
    pub inbound_nat_rules: Vec<InboundNatRule>,
    #[serde(default)]
    pub inbound_nat_pools: Vec<InboundNatPool>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendIpConfiguration {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: FrontendIpConfigurationProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendIpConfigurationProperties {
    #[serde(default, rename = "privateIPAddress")]
    pub private_ip_address: Option<String>,
    #[serde(default, rename = "privateIPAllocationMethod")]
    pub private_ip_allocation_method: Option<String>,
    #[serde(default)]
    pub subnet: Option<SubResource>,
    #[serde(default, rename = "publicIPAddress")]
    pub public_ip_address: Option<SubResource>,
    #[serde(default)]
    pub load_balancing_rules: Vec<SubResource>,
    #[serde(default)]
    pub inbound_nat_rules: Vec<SubResource>,
    #[serde(default)]
    pub inbound_nat_pools: Vec<SubResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendAddressPool {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: LoadBalancingRuleProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingRuleProperties {
    #[serde(default, rename = "frontendIPConfiguration")]
    pub frontend_ip_configuration: Option<SubResource>,
    #[serde(default)]
    pub backend_address_pool: Option<SubResource>,
    #[serde(default)]
    pub probe: Option<SubResource>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub frontend_port: Option<u32>,
    #[serde(default)]
    pub backend_port: Option<u32>,
    #[serde(default, rename = "enableFloatingIP")]
    pub enable_floating_ip: Option<bool>,
    #[serde(default)]
    pub idle_timeout_in_minutes: Option<u32>,
    #[serde(default)]
    pub load_distribution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: ProbeProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeProperties {
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub port: Option<u32>,
    #[serde(default)]
    pub interval_in_seconds: Option<u32>,
    #[serde(default)]
    pub number_of_probes: Option<u32>,
    #[serde(default)]
    pub request_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundNatRule {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: InboundNatRuleProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundNatRuleProperties {
    #[serde(default, rename = "frontendIPConfiguration")]
    pub frontend_ip_configuration: Option<SubResource>,
    #[serde(default, rename = "backendIPConfiguration")]
    pub backend_ip_configuration: Option<SubResource>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub frontend_port: Option<u32>,
    #[serde(default)]
    pub backend_port: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundNatPool {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: InboundNatPoolProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundNatPoolProperties {
    #[serde(default, rename = "frontendIPConfiguration")]
    pub frontend_ip_configuration: Option<SubResource>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub frontend_port_range_start: Option<u32>,
    #[serde(default)]
    pub frontend_port_range_end: Option<u32>,
    #[serde(default)]
    pub backend_port: Option<u32>,
}

// ─── Network Security Groups ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityGroup {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: NsgProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NsgProperties {
    #[serde(default)]
    pub security_rules: Vec<SecurityRule>,
    #[serde(default)]
    pub default_security_rules: Vec<SecurityRule>,
    #[serde(default)]
    pub network_interfaces: Vec<SubResource>,
    #[serde(default)]
    pub subnets: Vec<SubResource>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub properties: SecurityRuleProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_address_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

// ─── Local Network Gateways ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalNetworkGateway {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: LocalNetworkGatewayProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalNetworkGatewayProperties {
    #[serde(default)]
    pub local_network_address_space: Option<AddressSpace>,
    #[serde(default)]
    pub gateway_ip_address: Option<String>,
    #[serde(default)]
    pub bgp_settings: Option<BgpSettings>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BgpSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp_peering_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_weight: Option<i32>,
}

// ─── Request parameters ─────────────────────────────────────────────

/// Subnet declared inline in a virtual network body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubnetSpec {
    pub name: String,
    pub address_prefix: String,
    pub network_security_group_id: Option<String>,
    pub route_table_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualNetworkParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub dns_servers: Vec<String>,
    pub address_prefixes: Vec<String>,
    pub subnets: Vec<SubnetSpec>,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubnetParams {
    pub resource_group: String,
    pub virtual_network_name: String,
    pub name: String,
    pub address_prefix: String,
    pub network_security_group_id: Option<String>,
    pub route_table_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicIpParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub public_ip_allocation_method: String,
    pub idle_timeout_in_minutes: Option<u32>,
    pub domain_name_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkInterfaceParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub subnet_id: String,
    pub public_ip_address_id: Option<String>,
    pub network_security_group_id: Option<String>,
    pub ip_configuration_name: String,
    pub private_ip_allocation_method: String,
    pub private_ip_address: Option<String>,
    pub load_balancer_backend_address_pools_ids: Vec<String>,
    pub load_balancer_inbound_nat_rules_ids: Vec<String>,
}

/// Resource that can be attached to or detached from a NIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicResource {
    Subnet,
    PublicIp,
    NetworkSecurityGroup,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadBalancerParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub frontend_ip_configurations: Vec<FrontendIpConfigurationAttributes>,
    pub backend_address_pool_names: Vec<String>,
    pub load_balancing_rules: Vec<LoadBalancingRuleAttributes>,
    pub probes: Vec<ProbeAttributes>,
    pub inbound_nat_rules: Vec<InboundNatRuleAttributes>,
    pub inbound_nat_pools: Vec<InboundNatPoolAttributes>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSecurityGroupParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub security_rules: Vec<NetworkSecurityRuleAttributes>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalNetworkGatewayParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub gateway_ip_address: String,
    pub address_prefixes: Vec<String>,
    pub asn: Option<u64>,
    pub bgp_peering_address: Option<String>,
    pub peer_weight: Option<i32>,
    pub tags: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_interface_deserializes_ip_configuration() {
        let json = r#"{
            "id": "/subscriptions/s/resourceGroups/rg1/providers/Microsoft.Network/networkInterfaces/nic1",
            "name": "nic1",
            "location": "westus",
            "properties": {
                "ipConfigurations": [{
                    "id": "ipc-id",
                    "name": "ipconfig1",
                    "properties": {
                        "privateIPAddress": "10.0.0.4",
                        "privateIPAllocationMethod": "Dynamic",
                        "subnet": { "id": "subnet-id" },
                        "provisioningState": "Succeeded"
                    }
                }],
                "dnsSettings": { "dnsServers": [], "appliedDnsServers": ["10.1.1.1"] },
                "enableIPForwarding": false
            }
        }"#;
        let nic: NetworkInterface = serde_json::from_str(json).unwrap();
        let ipc = &nic.properties.ip_configurations[0];
        assert_eq!(ipc.properties.private_ip_address.as_deref(), Some("10.0.0.4"));
        assert_eq!(ipc.properties.subnet, Some(SubResource::new("subnet-id")));
        assert!(ipc.properties.public_ip_address.is_none());
        assert_eq!(nic.properties.enable_ip_forwarding, Some(false));
    }

    #[test]
    fn virtual_network_requires_properties() {
        let json = r#"{"id":"x","name":"vnet","location":"westus"}"#;
        assert!(serde_json::from_str::<VirtualNetwork>(json).is_err());
    }

    #[test]
    fn security_rule_skips_unset_fields() {
        let rule = SecurityRule {
            id: None,
            name: "web".into(),
            properties: SecurityRuleProperties {
                protocol: Some("Tcp".into()),
                priority: Some(100),
                ..Default::default()
            },
        };
        let v = serde_json::to_value(&rule).unwrap();
        assert_eq!(v["properties"]["protocol"], "Tcp");
        assert!(v["properties"].get("access").is_none());
    }
}
