//! Value objects nested in a load balancer payload. They are parsed out of
//! the parent and sent back inside it; none of them is saved on its own.

use serde::{Deserialize, Serialize};

use azrm_core::SubResource;

use crate::types::{
    FrontendIpConfiguration, InboundNatPool, InboundNatRule, LoadBalancingRule, Probe,
};

fn sub_id(sub: &Option<SubResource>) -> Option<String> {
    sub.as_ref().map(|s| s.id.clone())
}

fn ids(subs: &[SubResource]) -> Vec<String> {
    subs.iter().map(|s| s.id.clone()).collect()
}

fn non_empty(id: &str) -> Option<String> {
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontendIpConfigurationAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub public_ip_address_id: Option<String>,
    pub private_ip_allocation_method: Option<String>,
    pub private_ip_address: Option<String>,
    pub subnet_id: Option<String>,
    pub load_balancing_rules: Vec<String>,
    pub inbound_nat_rules: Vec<String>,
    pub inbound_nat_pools: Vec<String>,
}

impl FrontendIpConfigurationAttributes {
    pub fn parse(frontend: &FrontendIpConfiguration) -> Self {
        let p = &frontend.properties;
        Self {
            id: non_empty(&frontend.id),
            name: Some(frontend.name.clone()),
            public_ip_address_id: sub_id(&p.public_ip_address),
            private_ip_allocation_method: p.private_ip_allocation_method.clone(),
            private_ip_address: p.private_ip_address.clone(),
            subnet_id: sub_id(&p.subnet),
            load_balancing_rules: ids(&p.load_balancing_rules),
            inbound_nat_rules: ids(&p.inbound_nat_rules),
            inbound_nat_pools: ids(&p.inbound_nat_pools),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancingRuleAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub frontend_ip_configuration_id: Option<String>,
    pub backend_address_pool_id: Option<String>,
    pub probe_id: Option<String>,
    pub protocol: Option<String>,
    pub frontend_port: Option<u32>,
    pub backend_port: Option<u32>,
    pub enable_floating_ip: Option<bool>,
    pub idle_timeout_in_minutes: Option<u32>,
    pub load_distribution: Option<String>,
}

impl LoadBalancingRuleAttributes {
    pub fn parse(rule: &LoadBalancingRule) -> Self {
        let p = &rule.properties;
        Self {
            id: non_empty(&rule.id),
            name: Some(rule.name.clone()),
            frontend_ip_configuration_id: sub_id(&p.frontend_ip_configuration),
            backend_address_pool_id: sub_id(&p.backend_address_pool),
            probe_id: sub_id(&p.probe),
            protocol: p.protocol.clone(),
            frontend_port: p.frontend_port,
            backend_port: p.backend_port,
            enable_floating_ip: p.enable_floating_ip,
            idle_timeout_in_minutes: p.idle_timeout_in_minutes,
            load_distribution: p.load_distribution.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub protocol: Option<String>,
    pub port: Option<u32>,
    pub interval_in_seconds: Option<u32>,
    pub number_of_probes: Option<u32>,
    pub request_path: Option<String>,
}

impl ProbeAttributes {
    pub fn parse(probe: &Probe) -> Self {
        let p = &probe.properties;
        Self {
            id: non_empty(&probe.id),
            name: Some(probe.name.clone()),
            protocol: p.protocol.clone(),
            port: p.port,
            interval_in_seconds: p.interval_in_seconds,
            number_of_probes: p.number_of_probes,
            request_path: p.request_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundNatRuleAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub frontend_ip_configuration_id: Option<String>,
    pub backend_ip_configuration_id: Option<String>,
    pub protocol: Option<String>,
    pub frontend_port: Option<u32>,
    pub backend_port: Option<u32>,
}

impl InboundNatRuleAttributes {
    pub fn parse(rule: &InboundNatRule) -> Self {
        let p = &rule.properties;
        Self {
            id: non_empty(&rule.id),
            name: Some(rule.name.clone()),
            frontend_ip_configuration_id: sub_id(&p.frontend_ip_configuration),
            backend_ip_configuration_id: sub_id(&p.backend_ip_configuration),
            protocol: p.protocol.clone(),
            frontend_port: p.frontend_port,
            backend_port: p.backend_port,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundNatPoolAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub frontend_ip_configuration_id: Option<String>,
    pub protocol: Option<String>,
    pub frontend_port_range_start: Option<u32>,
    pub frontend_port_range_end: Option<u32>,
    pub backend_port: Option<u32>,
}

impl InboundNatPoolAttributes {
    pub fn parse(pool: &InboundNatPool) -> Self {
        let p = &pool.properties;
        Self {
            id: non_empty(&pool.id),
            name: Some(pool.name.clone()),
            frontend_ip_configuration_id: sub_id(&p.frontend_ip_configuration),
            protocol: p.protocol.clone(),
            frontend_port_range_start: p.frontend_port_range_start,
            frontend_port_range_end: p.frontend_port_range_end,
            backend_port: p.backend_port,
        }
    }
}
