//! Azure Load Balancers – list, get, create, delete.

use log::debug;
use serde_json::{json, Map, Value};

use azrm_core::{AzureClient, AzureResult};

use crate::models::load_balancer_components::{
    FrontendIpConfigurationAttributes, InboundNatPoolAttributes, InboundNatRuleAttributes,
    LoadBalancingRuleAttributes, ProbeAttributes,
};
use crate::types::{LoadBalancer, LoadBalancerParams};

fn load_balancer_url(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_network;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Network/loadBalancers/{}?api-version={}",
            name, api
        ),
    )
}

pub async fn list_load_balancers(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<LoadBalancer>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Network/loadBalancers?api-version={}", api),
    )?;
    debug!("list_load_balancers({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_load_balancer(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<LoadBalancer> {
    let url = load_balancer_url(client, resource_group, name)?;
    debug!("get_load_balancer({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn check_load_balancer_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = load_balancer_url(client, resource_group, name)?;
    client.exists(&url).await
}

pub async fn create_load_balancer(
    client: &AzureClient,
    params: &LoadBalancerParams,
) -> AzureResult<LoadBalancer> {
    let url = load_balancer_url(client, &params.resource_group, &params.name)?;
    debug!("create_load_balancer({}/{}) → {}", params.resource_group, params.name, url);
    client.put_json(&url, &load_balancer_body(params)).await
}

pub async fn delete_load_balancer(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<()> {
    let url = load_balancer_url(client, resource_group, name)?;
    debug!("delete_load_balancer({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}

// ─── Body builders ──────────────────────────────────────────────────

/// Collects only the properties that are set.
struct Props(Map<String, Value>);

impl Props {
    fn new() -> Self {
        Self(Map::new())
    }

    fn value<T: Into<Value> + Clone>(mut self, key: &str, value: &Option<T>) -> Self {
        if let Some(v) = value {
            self.0.insert(key.to_string(), v.clone().into());
        }
        self
    }

    fn reference(mut self, key: &str, id: &Option<String>) -> Self {
        if let Some(id) = id {
            self.0.insert(key.to_string(), json!({ "id": id }));
        }
        self
    }

    fn named(self, name: &Option<String>) -> Value {
        json!({ "name": name, "properties": Value::Object(self.0) })
    }
}

fn frontend_body(f: &FrontendIpConfigurationAttributes) -> Value {
    Props::new()
        .value("privateIPAllocationMethod", &f.private_ip_allocation_method)
        .value("privateIPAddress", &f.private_ip_address)
        .reference("publicIPAddress", &f.public_ip_address_id)
        .reference("subnet", &f.subnet_id)
        .named(&f.name)
}

fn rule_body(r: &LoadBalancingRuleAttributes) -> Value {
    Props::new()
        .reference("frontendIPConfiguration", &r.frontend_ip_configuration_id)
        .reference("backendAddressPool", &r.backend_address_pool_id)
        .reference("probe", &r.probe_id)
        .value("protocol", &r.protocol)
        .value("frontendPort", &r.frontend_port)
        .value("backendPort", &r.backend_port)
        .value("enableFloatingIP", &r.enable_floating_ip)
        .value("idleTimeoutInMinutes", &r.idle_timeout_in_minutes)
        .value("loadDistribution", &r.load_distribution)
        .named(&r.name)
}

fn probe_body(p: &ProbeAttributes) -> Value {
    Props::new()
        .value("protocol", &p.protocol)
        .value("port", &p.port)
        .value("intervalInSeconds", &p.interval_in_seconds)
        .value("numberOfProbes", &p.number_of_probes)
        .value("requestPath", &p.request_path)
        .named(&p.name)
}

fn nat_rule_body(r: &InboundNatRuleAttributes) -> Value {
    Props::new()
        .reference("frontendIPConfiguration", &r.frontend_ip_configuration_id)
        .value("protocol", &r.protocol)
        .value("frontendPort", &r.frontend_port)
        .value("backendPort", &r.backend_port)
        .named(&r.name)
}

fn nat_pool_body(p: &InboundNatPoolAttributes) -> Value {
    Props::new()
        .reference("frontendIPConfiguration", &p.frontend_ip_configuration_id)
        .value("protocol", &p.protocol)
        .value("frontendPortRangeStart", &p.frontend_port_range_start)
        .value("frontendPortRangeEnd", &p.frontend_port_range_end)
        .value("backendPort", &p.backend_port)
        .named(&p.name)
}

pub fn load_balancer_body(params: &LoadBalancerParams) -> Value {
    json!({
        "location": params.location,
        "properties": {
            "frontendIPConfigurations": params.frontend_ip_configurations.iter().map(frontend_body).collect::<Vec<_>>(),
            "backendAddressPools": params.backend_address_pool_names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>(),
            "loadBalancingRules": params.load_balancing_rules.iter().map(rule_body).collect::<Vec<_>>(),
            "probes": params.probes.iter().map(probe_body).collect::<Vec<_>>(),
            "inboundNatRules": params.inbound_nat_rules.iter().map(nat_rule_body).collect::<Vec<_>>(),
            "inboundNatPools": params.inbound_nat_pools.iter().map(nat_pool_body).collect::<Vec<_>>(),
        }
    })
}
