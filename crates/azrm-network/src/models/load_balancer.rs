use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::models::load_balancer_components::{
    FrontendIpConfigurationAttributes, InboundNatPoolAttributes, InboundNatRuleAttributes,
    LoadBalancingRuleAttributes, ProbeAttributes,
};
use crate::service::NetworkService;
use crate::types::{self, LoadBalancerParams};

const KIND: &str = "LoadBalancer";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub frontend_ip_configurations: Option<Vec<FrontendIpConfigurationAttributes>>,
    pub backend_address_pool_names: Option<Vec<String>>,
    pub load_balancing_rules: Option<Vec<LoadBalancingRuleAttributes>>,
    pub probes: Option<Vec<ProbeAttributes>>,
    pub inbound_nat_rules: Option<Vec<InboundNatRuleAttributes>>,
    pub inbound_nat_pools: Option<Vec<InboundNatPoolAttributes>>,
}

impl Attributes for LoadBalancerAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct LoadBalancer {
    service: Arc<dyn NetworkService>,
    pub attributes: LoadBalancerAttributes,
}

impl fmt::Debug for LoadBalancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadBalancer")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl LoadBalancer {
    pub fn new(service: Arc<dyn NetworkService>, attributes: LoadBalancerAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(lb: &types::LoadBalancer) -> LoadBalancerAttributes {
        let p = &lb.properties;
        LoadBalancerAttributes {
            id: Some(lb.id.clone()),
            name: Some(lb.name.clone()),
            location: Some(lb.location.clone()),
            resource_group: resource_group_from_id(&lb.id),
            frontend_ip_configurations: Some(
                p.frontend_ip_configurations
                    .iter()
                    .map(FrontendIpConfigurationAttributes::parse)
                    .collect(),
            ),
            backend_address_pool_names: Some(p.backend_address_pools.iter().map(|b| b.name.clone()).collect()),
            load_balancing_rules: Some(p.load_balancing_rules.iter().map(LoadBalancingRuleAttributes::parse).collect()),
            probes: Some(p.probes.iter().map(ProbeAttributes::parse).collect()),
            inbound_nat_rules: Some(p.inbound_nat_rules.iter().map(InboundNatRuleAttributes::parse).collect()),
            inbound_nat_pools: Some(p.inbound_nat_pools.iter().map(InboundNatPoolAttributes::parse).collect()),
        }
    }

    fn load_balancer_params(&self) -> AzureResult<LoadBalancerParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .check()?;
        Ok(LoadBalancerParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            frontend_ip_configurations: a.frontend_ip_configurations.clone().unwrap_or_default(),
            backend_address_pool_names: a.backend_address_pool_names.clone().unwrap_or_default(),
            load_balancing_rules: a.load_balancing_rules.clone().unwrap_or_default(),
            probes: a.probes.clone().unwrap_or_default(),
            inbound_nat_rules: a.inbound_nat_rules.clone().unwrap_or_default(),
            inbound_nat_pools: a.inbound_nat_pools.clone().unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.load_balancer_params()?;
        let lb = self.service.create_load_balancer(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&lb));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_load_balancer(rg, name).await
    }
}

pub struct LoadBalancers {
    service: Arc<dyn NetworkService>,
    pub resource_group: Option<String>,
    loaded: Vec<LoadBalancer>,
}

impl LoadBalancers {
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

    pub async fn all(&mut self) -> AzureResult<&[LoadBalancer]> {
        let rg = require("LoadBalancers", "resource_group", &self.resource_group)?;
        let lbs = self.service.list_load_balancers(rg).await?;
        self.loaded = lbs
            .iter()
            .map(|lb| LoadBalancer::new(self.service.clone(), LoadBalancer::parse(lb)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<LoadBalancer> {
        let lb = self.service.get_load_balancer(resource_group, name).await?;
        Ok(LoadBalancer::new(self.service.clone(), LoadBalancer::parse(&lb)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&LoadBalancer> {
        self.loaded
            .iter()
            .find(|lb| lb.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[LoadBalancer] {
        &self.loaded
    }

    pub async fn create(&self, attributes: LoadBalancerAttributes) -> AzureResult<LoadBalancer> {
        let mut lb = LoadBalancer::new(self.service.clone(), attributes);
        lb.save().await?;
        Ok(lb)
    }

    pub async fn check_load_balancer_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_load_balancer_exists(resource_group, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockNetworkService;
    use crate::types::{
        BackendAddressPool, FrontendIpConfiguration, FrontendIpConfigurationProperties, InboundNatPool,
        InboundNatPoolProperties, InboundNatRule, InboundNatRuleProperties, LoadBalancerProperties,
        LoadBalancingRule, LoadBalancingRuleProperties, Probe, ProbeProperties,
    };
    use azrm_core::SubResource;

    const LB_ID: &str = "/subscriptions/s/resourceGroups/fog-rg/providers/Microsoft.Network/loadBalancers/lb";

    fn wire() -> types::LoadBalancer {
        let fe = format!("{}/frontendIPConfigurations/fe", LB_ID);
        types::LoadBalancer {
            id: LB_ID.into(),
            name: "lb".into(),
            location: "westus".into(),
            properties: LoadBalancerProperties {
                frontend_ip_configurations: vec![FrontendIpConfiguration {
                    id: fe.clone(),
                    name: "fe".into(),
                    properties: FrontendIpConfigurationProperties {
                        public_ip_address: Some(SubResource::new("pip-id")),
                        private_ip_allocation_method: Some("Dynamic".into()),
                        ..Default::default()
                    },
                }],
                backend_address_pools: vec![BackendAddressPool {
                    id: format!("{}/backendAddressPools/pool", LB_ID),
                    name: "pool".into(),
                }],
                load_balancing_rules: vec![LoadBalancingRule {
                    id: format!("{}/loadBalancingRules/http", LB_ID),
                    name: "http".into(),
                    properties: LoadBalancingRuleProperties {
                        frontend_ip_configuration: Some(SubResource::new(fe.clone())),
                        protocol: Some("Tcp".into()),
                        frontend_port: Some(80),
                        backend_port: Some(80),
                        ..Default::default()
                    },
                }],
                probes: vec![Probe {
                    id: format!("{}/probes/probe1", LB_ID),
                    name: "probe1".into(),
                    properties: ProbeProperties {
                        protocol: Some("Tcp".into()),
                        port: Some(80),
                        interval_in_seconds: Some(5),
                        number_of_probes: Some(2),
                        request_path: None,
                    },
                }],
                inbound_nat_rules: vec![InboundNatRule {
                    id: format!("{}/inboundNatRules/rdp", LB_ID),
                    name: "rdp".into(),
                    properties: InboundNatRuleProperties {
                        frontend_ip_configuration: Some(SubResource::new(fe.clone())),
                        protocol: Some("Tcp".into()),
                        frontend_port: Some(3389),
                        backend_port: Some(3389),
                        backend_ip_configuration: None,
                    },
                }],
                inbound_nat_pools: vec![InboundNatPool {
                    id: format!("{}/inboundNatPools/ssh", LB_ID),
                    name: "ssh".into(),
                    properties: InboundNatPoolProperties {
                        frontend_ip_configuration: Some(SubResource::new(fe)),
                        protocol: Some("Tcp".into()),
                        frontend_port_range_start: Some(50000),
                        frontend_port_range_end: Some(50099),
                        backend_port: Some(22),
                    },
                }],
                provisioning_state: Some("Succeeded".into()),
            },
        }
    }

    #[test]
    fn parse_builds_every_sub_resource_list() {
        let a = LoadBalancer::parse(&wire());
        assert_eq!(a.resource_group.as_deref(), Some("fog-rg"));
        assert_eq!(a.backend_address_pool_names, Some(vec!["pool".to_string()]));
        let rules = a.load_balancing_rules.unwrap();
        assert_eq!(rules[0].frontend_ip_configuration_id.as_deref(), Some(format!("{}/frontendIPConfigurations/fe", LB_ID).as_str()));
        assert_eq!(a.probes.unwrap()[0].number_of_probes, Some(2));
        assert_eq!(a.inbound_nat_rules.unwrap()[0].frontend_port, Some(3389));
        assert_eq!(a.inbound_nat_pools.unwrap()[0].frontend_port_range_end, Some(50099));
        assert_eq!(
            a.frontend_ip_configurations.unwrap()[0].public_ip_address_id.as_deref(),
            Some("pip-id")
        );
    }

    #[tokio::test]
    async fn save_passes_sub_resources() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_load_balancer()
            .withf(|p: &LoadBalancerParams| {
                p.frontend_ip_configurations.len() == 1
                    && p.backend_address_pool_names == vec!["pool".to_string()]
                    && p.probes.is_empty()
            })
            .times(1)
            .returning(|_| Ok(wire()));
        let lbs = LoadBalancers::new(Arc::new(mock));
        let lb = lbs
            .create(LoadBalancerAttributes {
                name: Some("lb".into()),
                location: Some("westus".into()),
                resource_group: Some("fog-rg".into()),
                frontend_ip_configurations: Some(vec![FrontendIpConfigurationAttributes {
                    name: Some("fe".into()),
                    public_ip_address_id: Some("pip-id".into()),
                    ..Default::default()
                }]),
                backend_address_pool_names: Some(vec!["pool".into()]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(lb.attributes.probes.as_ref().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn save_without_location_makes_no_call() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_load_balancer().times(0);
        let mut lb = LoadBalancer::new(
            Arc::new(mock),
            LoadBalancerAttributes {
                name: Some("lb".into()),
                resource_group: Some("fog-rg".into()),
                ..Default::default()
            },
        );
        assert!(lb.save().await.unwrap_err().message.ends_with("location"));
    }

    #[tokio::test]
    async fn collection_all_get_destroy() {
        let mut mock = MockNetworkService::new();
        mock.expect_list_load_balancers().returning(|_| Ok(vec![wire()]));
        mock.expect_get_load_balancer()
            .withf(|rg: &str, name: &str| rg == "fog-rg" && name == "lb")
            .returning(|_, _| Ok(wire()));
        mock.expect_delete_load_balancer().times(1).returning(|_, _| Ok(true));
        let mut lbs = LoadBalancers::new(Arc::new(mock)).in_resource_group("fog-rg");
        assert_eq!(lbs.all().await.unwrap().len(), 1);
        let lb = lbs.get("fog-rg", "lb").await.unwrap();
        assert!(lb.destroy().await.unwrap());
    }
}
