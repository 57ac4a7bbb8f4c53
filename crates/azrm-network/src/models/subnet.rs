use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::{resource_group_from_id, segment_after};
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::NetworkService;
use crate::types::{self, SubnetParams, SubnetSpec};

const KIND: &str = "Subnet";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubnetAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_group: Option<String>,
    pub virtual_network_name: Option<String>,
    pub address_prefix: Option<String>,
    pub network_security_group_id: Option<String>,
    pub route_table_id: Option<String>,
    pub ip_configurations_ids: Option<Vec<String>>,
}

impl Attributes for SubnetAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

impl SubnetAttributes {
    /// Inline form used inside a virtual network body.
    pub fn spec(&self) -> AzureResult<SubnetSpec> {
        Requires::new(KIND)
            .field("name", &self.name)
            .field("address_prefix", &self.address_prefix)
            .check()?;
        Ok(SubnetSpec {
            name: require(KIND, "name", &self.name)?.to_string(),
            address_prefix: require(KIND, "address_prefix", &self.address_prefix)?.to_string(),
            network_security_group_id: self.network_security_group_id.clone(),
            route_table_id: self.route_table_id.clone(),
        })
    }
}

pub struct Subnet {
    service: Arc<dyn NetworkService>,
    pub attributes: SubnetAttributes,
}

impl fmt::Debug for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subnet")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl Subnet {
    pub fn new(service: Arc<dyn NetworkService>, attributes: SubnetAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(subnet: &types::Subnet) -> SubnetAttributes {
        let p = &subnet.properties;
        SubnetAttributes {
            id: Some(subnet.id.clone()),
            name: Some(subnet.name.clone()),
            resource_group: resource_group_from_id(&subnet.id),
            virtual_network_name: segment_after(&subnet.id, "virtualNetworks"),
            address_prefix: p.address_prefix.clone(),
            network_security_group_id: p.network_security_group.as_ref().map(|s| s.id.clone()),
            route_table_id: p.route_table.as_ref().map(|s| s.id.clone()),
            ip_configurations_ids: Some(p.ip_configurations.iter().map(|c| c.id.clone()).collect()),
        }
    }

    fn subnet_params(&self) -> AzureResult<SubnetParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("resource_group", &a.resource_group)
            .field("virtual_network_name", &a.virtual_network_name)
            .field("address_prefix", &a.address_prefix)
            .check()?;
        Ok(SubnetParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            virtual_network_name: require(KIND, "virtual_network_name", &a.virtual_network_name)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            address_prefix: require(KIND, "address_prefix", &a.address_prefix)?.to_string(),
            network_security_group_id: a.network_security_group_id.clone(),
            route_table_id: a.route_table_id.clone(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.subnet_params()?;
        let subnet = self.service.create_subnet(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&subnet));
        Ok(self)
    }

    fn identity(&self) -> AzureResult<(&str, &str, &str)> {
        let a = &self.attributes;
        Ok((
            require(KIND, "resource_group", &a.resource_group)?,
            require(KIND, "virtual_network_name", &a.virtual_network_name)?,
            require(KIND, "name", &a.name)?,
        ))
    }

    fn refresh(&mut self, subnet: &types::Subnet) {
        self.attributes = self.attributes.apply(Self::parse(subnet));
    }

    pub async fn attach_network_security_group(&mut self, network_security_group_id: &str) -> AzureResult<&Self> {
        let (rg, vnet, name) = self.identity()?;
        let subnet = self
            .service
            .attach_network_security_group_to_subnet(rg, vnet, name, network_security_group_id)
            .await?;
        self.refresh(&subnet);
        Ok(self)
    }

    pub async fn detach_network_security_group(&mut self) -> AzureResult<&Self> {
        let (rg, vnet, name) = self.identity()?;
        let subnet = self
            .service
            .detach_network_security_group_from_subnet(rg, vnet, name)
            .await?;
        self.refresh(&subnet);
        Ok(self)
    }

    pub async fn attach_route_table(&mut self, route_table_id: &str) -> AzureResult<&Self> {
        let (rg, vnet, name) = self.identity()?;
        let subnet = self
            .service
            .attach_route_table_to_subnet(rg, vnet, name, route_table_id)
            .await?;
        self.refresh(&subnet);
        Ok(self)
    }

    pub async fn detach_route_table(&mut self) -> AzureResult<&Self> {
        let (rg, vnet, name) = self.identity()?;
        let subnet = self.service.detach_route_table_from_subnet(rg, vnet, name).await?;
        self.refresh(&subnet);
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let (rg, vnet, name) = self.identity()?;
        self.service.delete_subnet(rg, vnet, name).await
    }
}

/// Subnets of one virtual network.
pub struct Subnets {
    service: Arc<dyn NetworkService>,
    pub resource_group: Option<String>,
    pub virtual_network_name: Option<String>,
    loaded: Vec<Subnet>,
}

impl Subnets {
    pub fn new(service: Arc<dyn NetworkService>) -> Self {
        Self {
            service,
            resource_group: None,
            virtual_network_name: None,
            loaded: Vec::new(),
        }
    }

    pub fn in_virtual_network(
        mut self,
        resource_group: impl Into<String>,
        virtual_network_name: impl Into<String>,
    ) -> Self {
        self.resource_group = Some(resource_group.into());
        self.virtual_network_name = Some(virtual_network_name.into());
        self
    }

    pub async fn all(&mut self) -> AzureResult<&[Subnet]> {
        Requires::new("Subnets")
            .field("resource_group", &self.resource_group)
            .field("virtual_network_name", &self.virtual_network_name)
            .check()?;
        let rg = require("Subnets", "resource_group", &self.resource_group)?;
        let vnet = require("Subnets", "virtual_network_name", &self.virtual_network_name)?;
        let subnets = self.service.list_subnets(rg, vnet).await?;
        self.loaded = subnets
            .iter()
            .map(|s| Subnet::new(self.service.clone(), Subnet::parse(s)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, virtual_network_name: &str, name: &str) -> AzureResult<Subnet> {
        let subnet = self
            .service
            .get_subnet(resource_group, virtual_network_name, name)
            .await?;
        Ok(Subnet::new(self.service.clone(), Subnet::parse(&subnet)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&Subnet> {
        self.loaded
            .iter()
            .find(|s| s.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[Subnet] {
        &self.loaded
    }

    pub async fn create(&self, attributes: SubnetAttributes) -> AzureResult<Subnet> {
        let mut subnet = Subnet::new(self.service.clone(), attributes);
        subnet.save().await?;
        Ok(subnet)
    }

    pub async fn check_subnet_exists(
        &self,
        resource_group: &str,
        virtual_network_name: &str,
        name: &str,
    ) -> AzureResult<bool> {
        self.service
            .check_subnet_exists(resource_group, virtual_network_name, name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockNetworkService;
    use crate::types::SubnetProperties;
    use azrm_core::SubResource;

    const SUBNET_ID: &str =
        "/subscriptions/s/resourceGroups/fog-rg/providers/Microsoft.Network/virtualNetworks/fog-vnet/subnets/fog-subnet";

    fn wire(nsg: Option<&str>, route_table: Option<&str>) -> types::Subnet {
        types::Subnet {
            id: SUBNET_ID.into(),
            name: "fog-subnet".into(),
            properties: SubnetProperties {
                address_prefix: Some("10.1.0.0/24".into()),
                network_security_group: nsg.map(SubResource::new),
                route_table: route_table.map(SubResource::new),
                ip_configurations: vec![SubResource::new("ipc-1")],
                provisioning_state: Some("Succeeded".into()),
            },
        }
    }

    fn attrs() -> SubnetAttributes {
        Subnet::parse(&wire(None, None))
    }

    #[test]
    fn parse_reads_scope_from_id() {
        let a = attrs();
        assert_eq!(a.resource_group.as_deref(), Some("fog-rg"));
        assert_eq!(a.virtual_network_name.as_deref(), Some("fog-vnet"));
        assert_eq!(a.ip_configurations_ids, Some(vec!["ipc-1".to_string()]));
        assert!(a.network_security_group_id.is_none());
    }

    #[tokio::test]
    async fn save_requires_virtual_network() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_subnet().times(0);
        let mut subnet = Subnet::new(
            Arc::new(mock),
            SubnetAttributes {
                name: Some("fog-subnet".into()),
                resource_group: Some("fog-rg".into()),
                ..Default::default()
            },
        );
        let err = subnet.save().await.unwrap_err();
        assert!(err.message.ends_with("virtual_network_name, address_prefix"));
    }

    #[tokio::test]
    async fn attach_and_detach_refresh_attributes() {
        let mut mock = MockNetworkService::new();
        mock.expect_attach_network_security_group_to_subnet()
            .withf(|rg: &str, vnet: &str, name: &str, nsg: &str| {
                rg == "fog-rg" && vnet == "fog-vnet" && name == "fog-subnet" && nsg == "nsg-id"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(wire(Some("nsg-id"), None)));
        mock.expect_attach_route_table_to_subnet()
            .times(1)
            .returning(|_, _, _, _| Ok(wire(Some("nsg-id"), Some("rt-id"))));
        mock.expect_detach_network_security_group_from_subnet()
            .times(1)
            .returning(|_, _, _| Ok(wire(None, Some("rt-id"))));
        mock.expect_detach_route_table_from_subnet()
            .times(1)
            .returning(|_, _, _| Ok(wire(None, None)));

        let mut subnet = Subnet::new(Arc::new(mock), attrs());
        subnet.attach_network_security_group("nsg-id").await.unwrap();
        assert_eq!(subnet.attributes.network_security_group_id.as_deref(), Some("nsg-id"));
        subnet.attach_route_table("rt-id").await.unwrap();
        assert_eq!(subnet.attributes.route_table_id.as_deref(), Some("rt-id"));
        subnet.detach_network_security_group().await.unwrap();
        assert!(subnet.attributes.network_security_group_id.is_none());
        subnet.detach_route_table().await.unwrap();
        assert!(subnet.attributes.route_table_id.is_none());
    }

    #[tokio::test]
    async fn collection_all_get_and_destroy() {
        let mut mock = MockNetworkService::new();
        mock.expect_list_subnets()
            .withf(|rg: &str, vnet: &str| rg == "fog-rg" && vnet == "fog-vnet")
            .returning(|_, _| Ok(vec![wire(None, None)]));
        mock.expect_get_subnet().returning(|_, _, _| Ok(wire(None, None)));
        mock.expect_delete_subnet().times(1).returning(|_, _, _| Ok(true));

        let mut subnets = Subnets::new(Arc::new(mock)).in_virtual_network("fog-rg", "fog-vnet");
        assert_eq!(subnets.all().await.unwrap().len(), 1);
        let subnet = subnets.get("fog-rg", "fog-vnet", "fog-subnet").await.unwrap();
        assert_eq!(subnet.attributes.address_prefix.as_deref(), Some("10.1.0.0/24"));
        assert!(subnet.destroy().await.unwrap());
    }

    #[tokio::test]
    async fn all_without_scope_makes_no_call() {
        let mut mock = MockNetworkService::new();
        mock.expect_list_subnets().times(0);
        let mut subnets = Subnets::new(Arc::new(mock));
        assert!(subnets.all().await.is_err());
    }

    #[test]
    fn spec_requires_prefix() {
        let a = SubnetAttributes {
            name: Some("web".into()),
            ..Default::default()
        };
        assert!(a.spec().is_err());
    }
}
