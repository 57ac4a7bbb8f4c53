use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::NetworkService;
use crate::types::{self, LocalNetworkGatewayParams};

const KIND: &str = "LocalNetworkGateway";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalNetworkGatewayAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub gateway_ip_address: Option<String>,
    pub local_network_address_space_prefixes: Option<Vec<String>>,
    pub asn: Option<u64>,
    pub bgp_peering_address: Option<String>,
    pub peer_weight: Option<i32>,
    pub provisioning_state: Option<String>,
}

impl Attributes for LocalNetworkGatewayAttributes {
    fn apply(&self, parsed: Self) -> Self {
        Self {
            local_network_address_space_prefixes: parsed
                .local_network_address_space_prefixes
                .or_else(|| self.local_network_address_space_prefixes.clone()),
            asn: parsed.asn.or(self.asn),
            bgp_peering_address: parsed
                .bgp_peering_address
                .or_else(|| self.bgp_peering_address.clone()),
            peer_weight: parsed.peer_weight.or(self.peer_weight),
            ..parsed
        }
    }
}

pub struct LocalNetworkGateway {
    service: Arc<dyn NetworkService>,
    pub attributes: LocalNetworkGatewayAttributes,
}

impl fmt::Debug for LocalNetworkGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalNetworkGateway")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl LocalNetworkGateway {
    pub fn new(service: Arc<dyn NetworkService>, attributes: LocalNetworkGatewayAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(gateway: &types::LocalNetworkGateway) -> LocalNetworkGatewayAttributes {
        let p = &gateway.properties;
        let bgp = p.bgp_settings.as_ref();
        LocalNetworkGatewayAttributes {
            id: Some(gateway.id.clone()),
            name: Some(gateway.name.clone()),
            location: Some(gateway.location.clone()),
            resource_group: resource_group_from_id(&gateway.id),
            tags: gateway.tags.clone(),
            gateway_ip_address: p.gateway_ip_address.clone(),
            local_network_address_space_prefixes: p
                .local_network_address_space
                .as_ref()
                .map(|s| s.address_prefixes.clone()),
            asn: bgp.and_then(|b| b.asn),
            bgp_peering_address: bgp.and_then(|b| b.bgp_peering_address.clone()),
            peer_weight: bgp.and_then(|b| b.peer_weight),
            provisioning_state: p.provisioning_state.clone(),
        }
    }

    fn gateway_params(&self) -> AzureResult<LocalNetworkGatewayParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .field("gateway_ip_address", &a.gateway_ip_address)
            .field("local_network_address_space_prefixes", &a.local_network_address_space_prefixes)
            .check()?;
        Ok(LocalNetworkGatewayParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            gateway_ip_address: require(KIND, "gateway_ip_address", &a.gateway_ip_address)?.to_string(),
            address_prefixes: a.local_network_address_space_prefixes.clone().unwrap_or_default(),
            asn: a.asn,
            bgp_peering_address: a.bgp_peering_address.clone(),
            peer_weight: a.peer_weight,
            tags: a.tags.clone().unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.gateway_params()?;
        let gateway = self
            .service
            .create_or_update_local_network_gateway(&params)
            .await?;
        self.attributes = self.attributes.apply(Self::parse(&gateway));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_local_network_gateway(rg, name).await
    }
}

pub struct LocalNetworkGateways {
    service: Arc<dyn NetworkService>,
    pub resource_group: Option<String>,
    loaded: Vec<LocalNetworkGateway>,
}

impl LocalNetworkGateways {
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

    pub async fn all(&mut self) -> AzureResult<&[LocalNetworkGateway]> {
        let rg = require("LocalNetworkGateways", "resource_group", &self.resource_group)?;
        let gateways = self.service.list_local_network_gateways(rg).await?;
        self.loaded = gateways
            .iter()
            .map(|g| LocalNetworkGateway::new(self.service.clone(), LocalNetworkGateway::parse(g)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<LocalNetworkGateway> {
        let gateway = self
            .service
            .get_local_network_gateway(resource_group, name)
            .await?;
        Ok(LocalNetworkGateway::new(self.service.clone(), LocalNetworkGateway::parse(&gateway)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&LocalNetworkGateway> {
        self.loaded
            .iter()
            .find(|g| g.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[LocalNetworkGateway] {
        &self.loaded
    }

    pub async fn create(&self, attributes: LocalNetworkGatewayAttributes) -> AzureResult<LocalNetworkGateway> {
        let mut gateway = LocalNetworkGateway::new(self.service.clone(), attributes);
        gateway.save().await?;
        Ok(gateway)
    }

    pub async fn check_local_network_gateway_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service
            .check_local_network_gateway_exists(resource_group, name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockNetworkService;
    use crate::types::{AddressSpace, BgpSettings, LocalNetworkGatewayProperties};

    fn wire() -> types::LocalNetworkGateway {
        types::LocalNetworkGateway {
            id: "/subscriptions/s/resourceGroups/learn-rg/providers/Microsoft.Network/localNetworkGateways/gw".into(),
            name: "gw".into(),
            location: "eastus".into(),
            tags: Some(HashMap::from([("env".to_string(), "test".to_string())])),
            properties: LocalNetworkGatewayProperties {
                local_network_address_space: Some(AddressSpace {
                    address_prefixes: vec!["192.168.0.0/24".into()],
                }),
                gateway_ip_address: Some("192.168.1.1".into()),
                bgp_settings: Some(BgpSettings {
                    asn: Some(100),
                    bgp_peering_address: Some("192.168.1.2".into()),
                    peer_weight: Some(3),
                }),
                provisioning_state: Some("Succeeded".into()),
            },
        }
    }

    fn attrs() -> LocalNetworkGatewayAttributes {
        LocalNetworkGatewayAttributes {
            name: Some("gw".into()),
            location: Some("eastus".into()),
            resource_group: Some("learn-rg".into()),
            gateway_ip_address: Some("192.168.1.1".into()),
            local_network_address_space_prefixes: Some(vec!["192.168.0.0/24".into()]),
            asn: Some(100),
            ..Default::default()
        }
    }

    #[test]
    fn parse_reads_bgp_settings() {
        let a = LocalNetworkGateway::parse(&wire());
        assert_eq!(a.asn, Some(100));
        assert_eq!(a.peer_weight, Some(3));
        assert_eq!(a.resource_group.as_deref(), Some("learn-rg"));
        assert_eq!(a.provisioning_state.as_deref(), Some("Succeeded"));
    }

    #[tokio::test]
    async fn save_requires_address_space() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_local_network_gateway().times(0);
        let mut attributes = attrs();
        attributes.local_network_address_space_prefixes = None;
        let mut gateway = LocalNetworkGateway::new(Arc::new(mock), attributes);
        let err = gateway.save().await.unwrap_err();
        assert!(err.message.ends_with("local_network_address_space_prefixes"));
    }

    #[test]
    fn apply_keeps_bgp_settings_when_response_omits_them() {
        let mut response = wire();
        response.properties.bgp_settings = None;
        let current = LocalNetworkGatewayAttributes {
            bgp_peering_address: Some("192.168.1.2".into()),
            peer_weight: Some(3),
            ..attrs()
        };
        let merged = current.apply(LocalNetworkGateway::parse(&response));
        assert_eq!(merged.asn, Some(100));
        assert_eq!(merged.bgp_peering_address.as_deref(), Some("192.168.1.2"));
        assert_eq!(merged.peer_weight, Some(3));
        assert!(merged.id.is_some());
        assert_eq!(merged.provisioning_state.as_deref(), Some("Succeeded"));
    }

    #[tokio::test]
    async fn create_then_list() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_local_network_gateway()
            .withf(|p: &LocalNetworkGatewayParams| p.asn == Some(100) && p.address_prefixes.len() == 1)
            .times(1)
            .returning(|_| Ok(wire()));
        mock.expect_list_local_network_gateways()
            .withf(|rg: &str| rg == "learn-rg")
            .returning(|_| Ok(vec![wire()]));
        mock.expect_delete_local_network_gateway()
            .times(1)
            .returning(|_, _| Ok(true));
        let service: Arc<dyn NetworkService> = Arc::new(mock);

        let mut gateways = LocalNetworkGateways::new(service).in_resource_group("learn-rg");
        let created = gateways.create(attrs()).await.unwrap();
        assert_eq!(created.attributes.bgp_peering_address.as_deref(), Some("192.168.1.2"));
        assert_eq!(gateways.all().await.unwrap().len(), 1);
        assert!(gateways.find_loaded("gw").unwrap().destroy().await.unwrap());
    }
}
