use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::NetworkService;
use crate::types::{self, NetworkInterfaceParams, NicResource};

const KIND: &str = "NetworkInterface";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterfaceAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub virtual_machine_id: Option<String>,
    pub mac_address: Option<String>,
    pub network_security_group_id: Option<String>,
    pub ip_configuration_name: Option<String>,
    pub ip_configuration_id: Option<String>,
    pub subnet_id: Option<String>,
    pub private_ip_allocation_method: Option<String>,
    pub private_ip_address: Option<String>,
    pub public_ip_address_id: Option<String>,
    pub load_balancer_backend_address_pools_ids: Option<Vec<String>>,
    pub load_balancer_inbound_nat_rules_ids: Option<Vec<String>>,
    pub dns_servers: Option<Vec<String>>,
    pub applied_dns_servers: Option<Vec<String>>,
    pub internal_dns_name_label: Option<String>,
    pub internal_fqdn: Option<String>,
}

impl Attributes for NetworkInterfaceAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct NetworkInterface {
    service: Arc<dyn NetworkService>,
    pub attributes: NetworkInterfaceAttributes,
}

impl fmt::Debug for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkInterface")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl NetworkInterface {
    pub fn new(service: Arc<dyn NetworkService>, attributes: NetworkInterfaceAttributes) -> Self {
        Self { service, attributes }
    }

    /// Only the first IP configuration is projected.
    pub fn parse(nic: &types::NetworkInterface) -> NetworkInterfaceAttributes {
        let p = &nic.properties;
        let ipc = p.ip_configurations.first();
        let ipp = ipc.map(|c| &c.properties);
        let dns = p.dns_settings.as_ref();
        NetworkInterfaceAttributes {
            id: Some(nic.id.clone()),
            name: Some(nic.name.clone()),
            location: Some(nic.location.clone()),
            resource_group: resource_group_from_id(&nic.id),
            virtual_machine_id: p.virtual_machine.as_ref().map(|s| s.id.clone()),
            mac_address: p.mac_address.clone(),
            network_security_group_id: p.network_security_group.as_ref().map(|s| s.id.clone()),
            ip_configuration_name: ipc.map(|c| c.name.clone()),
            ip_configuration_id: ipc.map(|c| c.id.clone()),
            subnet_id: ipp.and_then(|i| i.subnet.as_ref()).map(|s| s.id.clone()),
            private_ip_allocation_method: ipp.and_then(|i| i.private_ip_allocation_method.clone()),
            private_ip_address: ipp.and_then(|i| i.private_ip_address.clone()),
            public_ip_address_id: ipp.and_then(|i| i.public_ip_address.as_ref()).map(|s| s.id.clone()),
            load_balancer_backend_address_pools_ids: ipp.map(|i| {
                i.load_balancer_backend_address_pools
                    .iter()
                    .map(|s| s.id.clone())
                    .collect()
            }),
            load_balancer_inbound_nat_rules_ids: ipp.map(|i| {
                i.load_balancer_inbound_nat_rules
                    .iter()
                    .map(|s| s.id.clone())
                    .collect()
            }),
            dns_servers: dns.map(|d| d.dns_servers.clone()),
            applied_dns_servers: dns.map(|d| d.applied_dns_servers.clone()),
            internal_dns_name_label: dns.and_then(|d| d.internal_dns_name_label.clone()),
            internal_fqdn: dns.and_then(|d| d.internal_fqdn.clone()),
        }
    }

    fn network_interface_params(&self) -> AzureResult<NetworkInterfaceParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .field("subnet_id", &a.subnet_id)
            .field("ip_configuration_name", &a.ip_configuration_name)
            .field("private_ip_allocation_method", &a.private_ip_allocation_method)
            .check()?;
        Ok(NetworkInterfaceParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            subnet_id: require(KIND, "subnet_id", &a.subnet_id)?.to_string(),
            public_ip_address_id: a.public_ip_address_id.clone(),
            network_security_group_id: a.network_security_group_id.clone(),
            ip_configuration_name: require(KIND, "ip_configuration_name", &a.ip_configuration_name)?.to_string(),
            private_ip_allocation_method: require(
                KIND,
                "private_ip_allocation_method",
                &a.private_ip_allocation_method,
            )?
            .to_string(),
            private_ip_address: a.private_ip_address.clone(),
            load_balancer_backend_address_pools_ids: a
                .load_balancer_backend_address_pools_ids
                .clone()
                .unwrap_or_default(),
            load_balancer_inbound_nat_rules_ids: a
                .load_balancer_inbound_nat_rules_ids
                .clone()
                .unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.network_interface_params()?;
        let nic = self.service.create_or_update_network_interface(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&nic));
        Ok(self)
    }

    fn identity(&self) -> AzureResult<(&str, &str)> {
        Ok((
            require(KIND, "resource_group", &self.attributes.resource_group)?,
            require(KIND, "name", &self.attributes.name)?,
        ))
    }

    async fn attach(&mut self, resource: NicResource, resource_id: &str) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let nic = self
            .service
            .attach_resource_to_nic(rg, name, resource, resource_id)
            .await?;
        self.attributes = self.attributes.apply(Self::parse(&nic));
        Ok(self)
    }

    async fn detach(&mut self, resource: NicResource) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let nic = self.service.detach_resource_from_nic(rg, name, resource).await?;
        self.attributes = self.attributes.apply(Self::parse(&nic));
        Ok(self)
    }

    pub async fn attach_subnet(&mut self, subnet_id: &str) -> AzureResult<&Self> {
        self.attach(NicResource::Subnet, subnet_id).await
    }

    pub async fn attach_public_ip(&mut self, public_ip_id: &str) -> AzureResult<&Self> {
        self.attach(NicResource::PublicIp, public_ip_id).await
    }

    pub async fn detach_public_ip(&mut self) -> AzureResult<&Self> {
        self.detach(NicResource::PublicIp).await
    }

    pub async fn attach_network_security_group(&mut self, network_security_group_id: &str) -> AzureResult<&Self> {
        self.attach(NicResource::NetworkSecurityGroup, network_security_group_id)
            .await
    }

    pub async fn detach_network_security_group(&mut self) -> AzureResult<&Self> {
        self.detach(NicResource::NetworkSecurityGroup).await
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.delete_network_interface(rg, name).await
    }
}

pub struct NetworkInterfaces {
    service: Arc<dyn NetworkService>,
    pub resource_group: Option<String>,
    loaded: Vec<NetworkInterface>,
}

impl NetworkInterfaces {
    pub fn new(service: Arc<dyn NetworkService>) -> Self {
        Self {
            service,
            resource_group: None,
            loaded: Vec::new(),
        }
    }

    pub fn in_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self
    }

    pub async fn all(&mut self) -> AzureResult<&[NetworkInterface]> {
        let rg = require("NetworkInterfaces", "resource_group", &self.resource_group)?;
        let nics = self.service.list_network_interfaces(rg).await?;
        self.loaded = nics
            .iter()
            .map(|n| NetworkInterface::new(self.service.clone(), NetworkInterface::parse(n)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<NetworkInterface> {
        let nic = self.service.get_network_interface(resource_group, name).await?;
        Ok(NetworkInterface::new(self.service.clone(), NetworkInterface::parse(&nic)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&NetworkInterface> {
        self.loaded
            .iter()
            .find(|n| n.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[NetworkInterface] {
        &self.loaded
    }

    pub async fn create(&self, attributes: NetworkInterfaceAttributes) -> AzureResult<NetworkInterface> {
        let mut nic = NetworkInterface::new(self.service.clone(), attributes);
        nic.save().await?;
        Ok(nic)
    }

    pub async fn check_network_interface_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service
            .check_network_interface_exists(resource_group, name)
            .await
    }
}
