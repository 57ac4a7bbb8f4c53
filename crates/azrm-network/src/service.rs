//! Remote operations the network models depend on.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use azrm_core::{AzureClient, AzureResult};

use crate::models::network_security_rule::NetworkSecurityRuleAttributes;
use crate::types::{
    LoadBalancer, LoadBalancerParams, LocalNetworkGateway, LocalNetworkGatewayParams,
    NetworkInterface, NetworkInterfaceParams, NetworkSecurityGroup, NetworkSecurityGroupParams,
    NicResource, PublicIpAddress, PublicIpParams, Subnet, SubnetParams, SubnetSpec,
    VirtualNetwork, VirtualNetworkParams,
};
use crate::{
    load_balancers, local_network_gateways, network_interfaces, network_security_groups,
    public_ips, subnets, virtual_networks,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkService: Send + Sync {
    // ── Virtual networks ─────────────────────────────────────────────
    async fn list_virtual_networks(&self, resource_group: &str) -> AzureResult<Vec<VirtualNetwork>>;
    async fn get_virtual_network(&self, resource_group: &str, name: &str) -> AzureResult<VirtualNetwork>;
    async fn check_virtual_network_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_virtual_network(
        &self,
        params: &VirtualNetworkParams,
    ) -> AzureResult<VirtualNetwork>;
    async fn delete_virtual_network(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn add_dns_servers_in_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        dns_servers: &[String],
    ) -> AzureResult<VirtualNetwork>;
    async fn remove_dns_servers_from_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        dns_servers: &[String],
    ) -> AzureResult<VirtualNetwork>;
    async fn add_address_prefixes_in_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        prefixes: &[String],
    ) -> AzureResult<VirtualNetwork>;
    async fn remove_address_prefixes_from_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        prefixes: &[String],
    ) -> AzureResult<VirtualNetwork>;
    async fn add_subnets_in_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        subnets: &[SubnetSpec],
    ) -> AzureResult<VirtualNetwork>;
    async fn remove_subnets_from_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        subnet_names: &[String],
    ) -> AzureResult<VirtualNetwork>;

    // ── Subnets ──────────────────────────────────────────────────────
    async fn list_subnets(&self, resource_group: &str, virtual_network: &str) -> AzureResult<Vec<Subnet>>;
    async fn get_subnet(&self, resource_group: &str, virtual_network: &str, name: &str) -> AzureResult<Subnet>;
    async fn check_subnet_exists(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
    ) -> AzureResult<bool>;
    async fn create_subnet(&self, params: &SubnetParams) -> AzureResult<Subnet>;
    async fn delete_subnet(&self, resource_group: &str, virtual_network: &str, name: &str) -> AzureResult<bool>;
    async fn attach_network_security_group_to_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
        network_security_group_id: &str,
    ) -> AzureResult<Subnet>;
    async fn detach_network_security_group_from_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
    ) -> AzureResult<Subnet>;
    async fn attach_route_table_to_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
        route_table_id: &str,
    ) -> AzureResult<Subnet>;
    async fn detach_route_table_from_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
    ) -> AzureResult<Subnet>;

    // ── Public IPs ───────────────────────────────────────────────────
    async fn list_public_ips(&self, resource_group: &str) -> AzureResult<Vec<PublicIpAddress>>;
    async fn get_public_ip(&self, resource_group: &str, name: &str) -> AzureResult<PublicIpAddress>;
    async fn check_public_ip_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_public_ip(&self, params: &PublicIpParams) -> AzureResult<PublicIpAddress>;
    async fn delete_public_ip(&self, resource_group: &str, name: &str) -> AzureResult<bool>;

    // ── Network interfaces ───────────────────────────────────────────
    async fn list_network_interfaces(&self, resource_group: &str) -> AzureResult<Vec<NetworkInterface>>;
    async fn get_network_interface(&self, resource_group: &str, name: &str) -> AzureResult<NetworkInterface>;
    async fn check_network_interface_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_network_interface(
        &self,
        params: &NetworkInterfaceParams,
    ) -> AzureResult<NetworkInterface>;
    async fn delete_network_interface(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn attach_resource_to_nic(
        &self,
        resource_group: &str,
        name: &str,
        resource: NicResource,
        resource_id: &str,
    ) -> AzureResult<NetworkInterface>;
    async fn detach_resource_from_nic(
        &self,
        resource_group: &str,
        name: &str,
        resource: NicResource,
    ) -> AzureResult<NetworkInterface>;

    // ── Load balancers ───────────────────────────────────────────────
    async fn list_load_balancers(&self, resource_group: &str) -> AzureResult<Vec<LoadBalancer>>;
    async fn get_load_balancer(&self, resource_group: &str, name: &str) -> AzureResult<LoadBalancer>;
    async fn check_load_balancer_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_load_balancer(&self, params: &LoadBalancerParams) -> AzureResult<LoadBalancer>;
    async fn delete_load_balancer(&self, resource_group: &str, name: &str) -> AzureResult<bool>;

    // ── Network security groups ──────────────────────────────────────
    async fn list_network_security_groups(&self, resource_group: &str) -> AzureResult<Vec<NetworkSecurityGroup>>;
    async fn get_network_security_group(
        &self,
        resource_group: &str,
        name: &str,
    ) -> AzureResult<NetworkSecurityGroup>;
    async fn check_network_security_group_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_network_security_group(
        &self,
        params: &NetworkSecurityGroupParams,
    ) -> AzureResult<NetworkSecurityGroup>;
    async fn delete_network_security_group(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn add_security_rules(
        &self,
        resource_group: &str,
        name: &str,
        rules: &[NetworkSecurityRuleAttributes],
    ) -> AzureResult<NetworkSecurityGroup>;
    async fn remove_security_rule(
        &self,
        resource_group: &str,
        name: &str,
        rule_name: &str,
    ) -> AzureResult<NetworkSecurityGroup>;

    // ── Local network gateways ───────────────────────────────────────
    async fn list_local_network_gateways(&self, resource_group: &str) -> AzureResult<Vec<LocalNetworkGateway>>;
    async fn get_local_network_gateway(
        &self,
        resource_group: &str,
        name: &str,
    ) -> AzureResult<LocalNetworkGateway>;
    async fn check_local_network_gateway_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_local_network_gateway(
        &self,
        params: &LocalNetworkGatewayParams,
    ) -> AzureResult<LocalNetworkGateway>;
    async fn delete_local_network_gateway(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
}

/// `NetworkService` backed by the ARM REST API.
pub struct ArmNetworkService {
    client: Arc<AzureClient>,
}

impl ArmNetworkService {
    pub fn new(client: Arc<AzureClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NetworkService for ArmNetworkService {
    async fn list_virtual_networks(&self, resource_group: &str) -> AzureResult<Vec<VirtualNetwork>> {
        virtual_networks::list_virtual_networks(&self.client, resource_group).await
    }

    async fn get_virtual_network(&self, resource_group: &str, name: &str) -> AzureResult<VirtualNetwork> {
        virtual_networks::get_virtual_network(&self.client, resource_group, name).await
    }

    async fn check_virtual_network_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        virtual_networks::check_virtual_network_exists(&self.client, resource_group, name).await
    }

    async fn create_or_update_virtual_network(
        &self,
        params: &VirtualNetworkParams,
    ) -> AzureResult<VirtualNetwork> {
        let vnet = virtual_networks::create_or_update_virtual_network(&self.client, params).await?;
        info!("virtual network {} saved", vnet.id);
        Ok(vnet)
    }

    async fn delete_virtual_network(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        virtual_networks::delete_virtual_network(&self.client, resource_group, name).await?;
        info!("virtual network {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn add_dns_servers_in_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        dns_servers: &[String],
    ) -> AzureResult<VirtualNetwork> {
        virtual_networks::add_dns_servers_in_virtual_network(&self.client, resource_group, name, dns_servers)
            .await
    }

    async fn remove_dns_servers_from_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        dns_servers: &[String],
    ) -> AzureResult<VirtualNetwork> {
        virtual_networks::remove_dns_servers_from_virtual_network(&self.client, resource_group, name, dns_servers)
            .await
    }

    async fn add_address_prefixes_in_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        prefixes: &[String],
    ) -> AzureResult<VirtualNetwork> {
        virtual_networks::add_address_prefixes_in_virtual_network(&self.client, resource_group, name, prefixes)
            .await
    }

    async fn remove_address_prefixes_from_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        prefixes: &[String],
    ) -> AzureResult<VirtualNetwork> {
        virtual_networks::remove_address_prefixes_from_virtual_network(&self.client, resource_group, name, prefixes)
            .await
    }

    async fn add_subnets_in_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        subnets: &[SubnetSpec],
    ) -> AzureResult<VirtualNetwork> {
        virtual_networks::add_subnets_in_virtual_network(&self.client, resource_group, name, subnets).await
    }

    async fn remove_subnets_from_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        subnet_names: &[String],
    ) -> AzureResult<VirtualNetwork> {
        virtual_networks::remove_subnets_from_virtual_network(&self.client, resource_group, name, subnet_names)
            .await
    }

    async fn list_subnets(&self, resource_group: &str, virtual_network: &str) -> AzureResult<Vec<Subnet>> {
        subnets::list_subnets(&self.client, resource_group, virtual_network).await
    }

    async fn get_subnet(&self, resource_group: &str, virtual_network: &str, name: &str) -> AzureResult<Subnet> {
        subnets::get_subnet(&self.client, resource_group, virtual_network, name).await
    }

    async fn check_subnet_exists(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
    ) -> AzureResult<bool> {
        subnets::check_subnet_exists(&self.client, resource_group, virtual_network, name).await
    }

    async fn create_subnet(&self, params: &SubnetParams) -> AzureResult<Subnet> {
        let subnet = subnets::create_subnet(&self.client, params).await?;
        info!("subnet {} saved", subnet.id);
        Ok(subnet)
    }

    async fn delete_subnet(&self, resource_group: &str, virtual_network: &str, name: &str) -> AzureResult<bool> {
        subnets::delete_subnet(&self.client, resource_group, virtual_network, name).await?;
        info!("subnet {}/{}/{} deleted", resource_group, virtual_network, name);
        Ok(true)
    }

    async fn attach_network_security_group_to_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
        network_security_group_id: &str,
    ) -> AzureResult<Subnet> {
        subnets::attach_network_security_group_to_subnet(
            &self.client,
            resource_group,
            virtual_network,
            name,
            network_security_group_id,
        )
        .await
    }

    async fn detach_network_security_group_from_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
    ) -> AzureResult<Subnet> {
        subnets::detach_network_security_group_from_subnet(&self.client, resource_group, virtual_network, name)
            .await
    }

    async fn attach_route_table_to_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
        route_table_id: &str,
    ) -> AzureResult<Subnet> {
        subnets::attach_route_table_to_subnet(&self.client, resource_group, virtual_network, name, route_table_id)
            .await
    }

    async fn detach_route_table_from_subnet(
        &self,
        resource_group: &str,
        virtual_network: &str,
        name: &str,
    ) -> AzureResult<Subnet> {
        subnets::detach_route_table_from_subnet(&self.client, resource_group, virtual_network, name).await
    }

    async fn list_public_ips(&self, resource_group: &str) -> AzureResult<Vec<PublicIpAddress>> {
        public_ips::list_public_ips(&self.client, resource_group).await
    }

    async fn get_public_ip(&self, resource_group: &str, name: &str) -> AzureResult<PublicIpAddress> {
        public_ips::get_public_ip(&self.client, resource_group, name).await
    }

    async fn check_public_ip_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        public_ips::check_public_ip_exists(&self.client, resource_group, name).await
    }

    async fn create_or_update_public_ip(&self, params: &PublicIpParams) -> AzureResult<PublicIpAddress> {
        let ip = public_ips::create_or_update_public_ip(&self.client, params).await?;
        info!("public ip {} saved", ip.id);
        Ok(ip)
    }

    async fn delete_public_ip(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        public_ips::delete_public_ip(&self.client, resource_group, name).await?;
        info!("public ip {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn list_network_interfaces(&self, resource_group: &str) -> AzureResult<Vec<NetworkInterface>> {
        network_interfaces::list_network_interfaces(&self.client, resource_group).await
    }

    async fn get_network_interface(&self, resource_group: &str, name: &str) -> AzureResult<NetworkInterface> {
        network_interfaces::get_network_interface(&self.client, resource_group, name).await
    }

    async fn check_network_interface_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        network_interfaces::check_network_interface_exists(&self.client, resource_group, name).await
    }

    async fn create_or_update_network_interface(
        &self,
        params: &NetworkInterfaceParams,
    ) -> AzureResult<NetworkInterface> {
        let nic = network_interfaces::create_or_update_network_interface(&self.client, params).await?;
        info!("network interface {} saved", nic.id);
        Ok(nic)
    }

    async fn delete_network_interface(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        network_interfaces::delete_network_interface(&self.client, resource_group, name).await?;
        info!("network interface {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn attach_resource_to_nic(
        &self,
        resource_group: &str,
        name: &str,
        resource: NicResource,
        resource_id: &str,
    ) -> AzureResult<NetworkInterface> {
        network_interfaces::attach_resource_to_nic(&self.client, resource_group, name, resource, resource_id).await
    }

    async fn detach_resource_from_nic(
        &self,
        resource_group: &str,
        name: &str,
        resource: NicResource,
    ) -> AzureResult<NetworkInterface> {
        network_interfaces::detach_resource_from_nic(&self.client, resource_group, name, resource).await
    }

    async fn list_load_balancers(&self, resource_group: &str) -> AzureResult<Vec<LoadBalancer>> {
        load_balancers::list_load_balancers(&self.client, resource_group).await
    }

    async fn get_load_balancer(&self, resource_group: &str, name: &str) -> AzureResult<LoadBalancer> {
        load_balancers::get_load_balancer(&self.client, resource_group, name).await
    }

    async fn check_load_balancer_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        load_balancers::check_load_balancer_exists(&self.client, resource_group, name).await
    }

    async fn create_load_balancer(&self, params: &LoadBalancerParams) -> AzureResult<LoadBalancer> {
        let lb = load_balancers::create_load_balancer(&self.client, params).await?;
        info!("load balancer {} saved", lb.id);
        Ok(lb)
    }

    async fn delete_load_balancer(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        load_balancers::delete_load_balancer(&self.client, resource_group, name).await?;
        info!("load balancer {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn list_network_security_groups(&self, resource_group: &str) -> AzureResult<Vec<NetworkSecurityGroup>> {
        network_security_groups::list_network_security_groups(&self.client, resource_group).await
    }

    async fn get_network_security_group(
        &self,
        resource_group: &str,
        name: &str,
    ) -> AzureResult<NetworkSecurityGroup> {
        network_security_groups::get_network_security_group(&self.client, resource_group, name).await
    }

    async fn check_network_security_group_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        network_security_groups::check_network_security_group_exists(&self.client, resource_group, name).await
    }

    async fn create_or_update_network_security_group(
        &self,
        params: &NetworkSecurityGroupParams,
    ) -> AzureResult<NetworkSecurityGroup> {
        let nsg = network_security_groups::create_or_update_network_security_group(&self.client, params).await?;
        info!("network security group {} saved", nsg.id);
        Ok(nsg)
    }

    async fn delete_network_security_group(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        network_security_groups::delete_network_security_group(&self.client, resource_group, name).await?;
        info!("network security group {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn add_security_rules(
        &self,
        resource_group: &str,
        name: &str,
        rules: &[NetworkSecurityRuleAttributes],
    ) -> AzureResult<NetworkSecurityGroup> {
        network_security_groups::add_security_rules(&self.client, resource_group, name, rules).await
    }

    async fn remove_security_rule(
        &self,
        resource_group: &str,
        name: &str,
        rule_name: &str,
    ) -> AzureResult<NetworkSecurityGroup> {
        network_security_groups::remove_security_rule(&self.client, resource_group, name, rule_name).await
    }

    async fn list_local_network_gateways(&self, resource_group: &str) -> AzureResult<Vec<LocalNetworkGateway>> {
        local_network_gateways::list_local_network_gateways(&self.client, resource_group).await
    }

    async fn get_local_network_gateway(
        &self,
        resource_group: &str,
        name: &str,
    ) -> AzureResult<LocalNetworkGateway> {
        local_network_gateways::get_local_network_gateway(&self.client, resource_group, name).await
    }

    async fn check_local_network_gateway_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        local_network_gateways::check_local_network_gateway_exists(&self.client, resource_group, name).await
    }

    async fn create_or_update_local_network_gateway(
        &self,
        params: &LocalNetworkGatewayParams,
    ) -> AzureResult<LocalNetworkGateway> {
        let gateway = local_network_gateways::create_or_update_local_network_gateway(&self.client, params).await?;
        info!("local network gateway {} saved", gateway.id);
        Ok(gateway)
    }

    async fn delete_local_network_gateway(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        local_network_gateways::delete_local_network_gateway(&self.client, resource_group, name).await?;
        info!("local network gateway {}/{} deleted", resource_group, name);
        Ok(true)
    }
}
