use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::models::subnet::{Subnet, SubnetAttributes};
use crate::service::NetworkService;
use crate::types::{self, SubnetSpec, VirtualNetworkParams};

const KIND: &str = "VirtualNetwork";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetworkAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub dns_servers: Option<Vec<String>>,
    pub address_prefixes: Option<Vec<String>>,
    pub subnets: Option<Vec<SubnetAttributes>>,
    pub tags: Option<HashMap<String, String>>,
}

impl Attributes for VirtualNetworkAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct VirtualNetwork {
    service: Arc<dyn NetworkService>,
    pub attributes: VirtualNetworkAttributes,
}

impl fmt::Debug for VirtualNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualNetwork")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl VirtualNetwork {
    pub fn new(service: Arc<dyn NetworkService>, attributes: VirtualNetworkAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(vnet: &types::VirtualNetwork) -> VirtualNetworkAttributes {
        let p = &vnet.properties;
        VirtualNetworkAttributes {
            id: Some(vnet.id.clone()),
            name: Some(vnet.name.clone()),
            location: Some(vnet.location.clone()),
            resource_group: resource_group_from_id(&vnet.id),
            dns_servers: Some(
                p.dhcp_options
                    .as_ref()
                    .map(|d| d.dns_servers.clone())
                    .unwrap_or_default(),
            ),
            address_prefixes: Some(
                p.address_space
                    .as_ref()
                    .map(|s| s.address_prefixes.clone())
                    .unwrap_or_default(),
            ),
            subnets: Some(p.subnets.iter().map(Subnet::parse).collect()),
            tags: vnet.tags.clone(),
        }
    }

    fn virtual_network_params(&self) -> AzureResult<VirtualNetworkParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .check()?;
        let subnets = a
            .subnets
            .iter()
            .flatten()
            .map(SubnetAttributes::spec)
            .collect::<AzureResult<Vec<_>>>()?;
        Ok(VirtualNetworkParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            dns_servers: a.dns_servers.clone().unwrap_or_default(),
            address_prefixes: a.address_prefixes.clone().unwrap_or_default(),
            subnets,
            tags: a.tags.clone().unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.virtual_network_params()?;
        let vnet = self.service.create_or_update_virtual_network(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&vnet));
        Ok(self)
    }

    fn identity(&self) -> AzureResult<(&str, &str)> {
        Ok((
            require(KIND, "resource_group", &self.attributes.resource_group)?,
            require(KIND, "name", &self.attributes.name)?,
        ))
    }

    fn refresh(&mut self, vnet: &types::VirtualNetwork) {
        self.attributes = self.attributes.apply(Self::parse(vnet));
    }

    pub async fn add_dns_servers(&mut self, dns_servers: &[String]) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let vnet = self
            .service
            .add_dns_servers_in_virtual_network(rg, name, dns_servers)
            .await?;
        self.refresh(&vnet);
        Ok(self)
    }

    pub async fn remove_dns_servers(&mut self, dns_servers: &[String]) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let vnet = self
            .service
            .remove_dns_servers_from_virtual_network(rg, name, dns_servers)
            .await?;
        self.refresh(&vnet);
        Ok(self)
    }

    pub async fn add_address_prefixes(&mut self, prefixes: &[String]) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let vnet = self
            .service
            .add_address_prefixes_in_virtual_network(rg, name, prefixes)
            .await?;
        self.refresh(&vnet);
        Ok(self)
    }

    pub async fn remove_address_prefixes(&mut self, prefixes: &[String]) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let vnet = self
            .service
            .remove_address_prefixes_from_virtual_network(rg, name, prefixes)
            .await?;
        self.refresh(&vnet);
        Ok(self)
    }

    /// Every subnet is validated before any call is made.
    pub async fn add_subnets(&mut self, subnets: &[SubnetAttributes]) -> AzureResult<&Self> {
        let specs = subnets
            .iter()
            .map(SubnetAttributes::spec)
            .collect::<AzureResult<Vec<SubnetSpec>>>()?;
        let (rg, name) = self.identity()?;
        let vnet = self
            .service
            .add_subnets_in_virtual_network(rg, name, &specs)
            .await?;
        self.refresh(&vnet);
        Ok(self)
    }

    pub async fn remove_subnets(&mut self, subnet_names: &[String]) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let vnet = self
            .service
            .remove_subnets_from_virtual_network(rg, name, subnet_names)
            .await?;
        self.refresh(&vnet);
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.delete_virtual_network(rg, name).await
    }
}

pub struct VirtualNetworks {
    service: Arc<dyn NetworkService>,
    pub resource_group: Option<String>,
    loaded: Vec<VirtualNetwork>,
}

impl VirtualNetworks {
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

    pub async fn all(&mut self) -> AzureResult<&[VirtualNetwork]> {
        let rg = require("VirtualNetworks", "resource_group", &self.resource_group)?;
        let vnets = self.service.list_virtual_networks(rg).await?;
        self.loaded = vnets
            .iter()
            .map(|v| VirtualNetwork::new(self.service.clone(), VirtualNetwork::parse(v)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<VirtualNetwork> {
        let vnet = self.service.get_virtual_network(resource_group, name).await?;
        Ok(VirtualNetwork::new(self.service.clone(), VirtualNetwork::parse(&vnet)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&VirtualNetwork> {
        self.loaded
            .iter()
            .find(|v| v.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[VirtualNetwork] {
        &self.loaded
    }

    pub async fn create(&self, attributes: VirtualNetworkAttributes) -> AzureResult<VirtualNetwork> {
        let mut vnet = VirtualNetwork::new(self.service.clone(), attributes);
        vnet.save().await?;
        Ok(vnet)
    }

    pub async fn check_virtual_network_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_virtual_network_exists(resource_group, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockNetworkService;
    use crate::types::{AddressSpace, DhcpOptions, SubnetProperties, VirtualNetworkProperties};

    const VNET_ID: &str =
        "/subscriptions/s/resourceGroups/fog-rg/providers/Microsoft.Network/virtualNetworks/fog-vnet";

    fn wire(dns: &[&str], prefixes: &[&str], subnets: &[&str]) -> types::VirtualNetwork {
        types::VirtualNetwork {
            id: VNET_ID.into(),
            name: "fog-vnet".into(),
            location: "westus".into(),
            tags: None,
            properties: VirtualNetworkProperties {
                address_space: Some(AddressSpace {
                    address_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
                }),
                dhcp_options: Some(DhcpOptions {
                    dns_servers: dns.iter().map(|d| d.to_string()).collect(),
                }),
                subnets: subnets
                    .iter()
                    .map(|n| types::Subnet {
                        id: format!("{}/subnets/{}", VNET_ID, n),
                        name: n.to_string(),
                        properties: SubnetProperties {
                            address_prefix: Some("10.1.0.0/24".into()),
                            ..Default::default()
                        },
                    })
                    .collect(),
                provisioning_state: Some("Succeeded".into()),
            },
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_nests_subnets() {
        let a = VirtualNetwork::parse(&wire(&["10.1.0.5"], &["10.1.0.0/16"], &["default"]));
        assert_eq!(a.resource_group.as_deref(), Some("fog-rg"));
        assert_eq!(a.dns_servers, Some(strings(&["10.1.0.5"])));
        let subnets = a.subnets.unwrap();
        assert_eq!(subnets[0].virtual_network_name.as_deref(), Some("fog-vnet"));
    }

    #[test]
    fn parse_without_dhcp_options_gives_empty_list() {
        let mut vnet = wire(&[], &["10.1.0.0/16"], &[]);
        vnet.properties.dhcp_options = None;
        assert_eq!(VirtualNetwork::parse(&vnet).dns_servers, Some(Vec::new()));
    }

    #[tokio::test]
    async fn save_sends_inline_subnets() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_virtual_network()
            .withf(|p: &VirtualNetworkParams| {
                p.name == "fog-vnet" && p.subnets.len() == 1 && p.subnets[0].name == "default"
            })
            .times(1)
            .returning(|_| Ok(wire(&[], &["10.2.0.0/16"], &["default"])));
        let mut vnet = VirtualNetwork::new(
            Arc::new(mock),
            VirtualNetworkAttributes {
                name: Some("fog-vnet".into()),
                location: Some("westus".into()),
                resource_group: Some("fog-rg".into()),
                subnets: Some(vec![SubnetAttributes {
                    name: Some("default".into()),
                    address_prefix: Some("10.1.0.0/24".into()),
                    ..Default::default()
                }]),
                ..Default::default()
            },
        );
        vnet.save().await.unwrap();
        assert_eq!(vnet.attributes.address_prefixes, Some(strings(&["10.2.0.0/16"])));
        assert_eq!(vnet.attributes.id.as_deref(), Some(VNET_ID));
    }

    #[tokio::test]
    async fn save_rejects_incomplete_subnet() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_virtual_network().times(0);
        let mut vnet = VirtualNetwork::new(
            Arc::new(mock),
            VirtualNetworkAttributes {
                name: Some("fog-vnet".into()),
                location: Some("westus".into()),
                resource_group: Some("fog-rg".into()),
                subnets: Some(vec![SubnetAttributes {
                    name: Some("default".into()),
                    ..Default::default()
                }]),
                ..Default::default()
            },
        );
        let err = vnet.save().await.unwrap_err();
        assert!(err.message.ends_with("address_prefix"));
    }

    #[tokio::test]
    async fn dns_and_prefix_actions_refresh() {
        let mut mock = MockNetworkService::new();
        mock.expect_add_dns_servers_in_virtual_network()
            .withf(|rg: &str, name: &str, dns: &[String]| rg == "fog-rg" && name == "fog-vnet" && dns.len() == 2)
            .times(1)
            .returning(|_, _, _| Ok(wire(&["10.1.0.5", "10.1.0.6"], &["10.1.0.0/16"], &[])));
        mock.expect_remove_dns_servers_from_virtual_network()
            .times(1)
            .returning(|_, _, _| Ok(wire(&["10.1.0.6"], &["10.1.0.0/16"], &[])));
        mock.expect_add_address_prefixes_in_virtual_network()
            .times(1)
            .returning(|_, _, _| Ok(wire(&["10.1.0.6"], &["10.1.0.0/16", "10.3.0.0/16"], &[])));
        mock.expect_remove_address_prefixes_from_virtual_network()
            .times(1)
            .returning(|_, _, _| Ok(wire(&["10.1.0.6"], &["10.3.0.0/16"], &[])));

        let mut vnet = VirtualNetwork::new(Arc::new(mock), VirtualNetwork::parse(&wire(&[], &["10.1.0.0/16"], &[])));
        vnet.add_dns_servers(&strings(&["10.1.0.5", "10.1.0.6"])).await.unwrap();
        assert_eq!(vnet.attributes.dns_servers.as_ref().map(Vec::len), Some(2));
        vnet.remove_dns_servers(&strings(&["10.1.0.5"])).await.unwrap();
        assert_eq!(vnet.attributes.dns_servers, Some(strings(&["10.1.0.6"])));
        vnet.add_address_prefixes(&strings(&["10.3.0.0/16"])).await.unwrap();
        vnet.remove_address_prefixes(&strings(&["10.1.0.0/16"])).await.unwrap();
        assert_eq!(vnet.attributes.address_prefixes, Some(strings(&["10.3.0.0/16"])));
    }

    #[tokio::test]
    async fn subnet_actions() {
        let mut mock = MockNetworkService::new();
        mock.expect_add_subnets_in_virtual_network()
            .withf(|_: &str, _: &str, specs: &[SubnetSpec]| specs[0].address_prefix == "10.1.1.0/24")
            .times(1)
            .returning(|_, _, _| Ok(wire(&[], &["10.1.0.0/16"], &["default", "web"])));
        mock.expect_remove_subnets_from_virtual_network()
            .times(1)
            .returning(|_, _, _| Ok(wire(&[], &["10.1.0.0/16"], &["web"])));

        let mut vnet = VirtualNetwork::new(Arc::new(mock), VirtualNetwork::parse(&wire(&[], &["10.1.0.0/16"], &["default"])));
        vnet.add_subnets(&[SubnetAttributes {
            name: Some("web".into()),
            address_prefix: Some("10.1.1.0/24".into()),
            ..Default::default()
        }])
        .await
        .unwrap();
        assert_eq!(vnet.attributes.subnets.as_ref().map(Vec::len), Some(2));
        vnet.remove_subnets(&strings(&["default"])).await.unwrap();
        let names: Vec<_> = vnet
            .attributes
            .subnets
            .iter()
            .flatten()
            .filter_map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["web"]);
    }

    #[tokio::test]
    async fn collection_requires_resource_group() {
        let mut mock = MockNetworkService::new();
        mock.expect_list_virtual_networks().times(0);
        mock.expect_check_virtual_network_exists()
            .returning(|_, _| Ok(true));
        let mut vnets = VirtualNetworks::new(Arc::new(mock));
        assert!(vnets.all().await.is_err());
        assert!(vnets.check_virtual_network_exists("fog-rg", "fog-vnet").await.unwrap());
    }

    #[tokio::test]
    async fn collection_all_and_destroy() {
        let mut mock = MockNetworkService::new();
        mock.expect_list_virtual_networks()
            .returning(|_| Ok(vec![wire(&[], &["10.1.0.0/16"], &[])]));
        mock.expect_delete_virtual_network()
            .withf(|rg: &str, name: &str| rg == "fog-rg" && name == "fog-vnet")
            .times(1)
            .returning(|_, _| Ok(true));
        let mut vnets = VirtualNetworks::new(Arc::new(mock)).in_resource_group("fog-rg");
        vnets.all().await.unwrap();
        assert!(vnets.find_loaded("fog-vnet").unwrap().destroy().await.unwrap());
        assert!(vnets.find_loaded("missing").is_none());
    }
}
