//! Server-level firewall rules.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureResult};

use crate::servers::server_url;
use crate::types::{FirewallRule, FirewallRuleParams};

fn rule_url(client: &AzureClient, rg: &str, server_name: &str, name: &str) -> AzureResult<String> {
    server_url(client, rg, server_name, &format!("/firewallRules/{}", name))
}

pub async fn list_firewall_rules(client: &AzureClient, rg: &str, server_name: &str) -> AzureResult<Vec<FirewallRule>> {
    let url = server_url(client, rg, server_name, "/firewallRules")?;
    debug!("list_firewall_rules({}/{}) → {}", rg, server_name, url);
    client.get_all_pages(&url).await
}

pub async fn get_firewall_rule(client: &AzureClient, rg: &str, server_name: &str, name: &str) -> AzureResult<FirewallRule> {
    let url = rule_url(client, rg, server_name, name)?;
    debug!("get_firewall_rule({}/{}/{}) → {}", rg, server_name, name, url);
    client.get_json(&url).await
}

pub(crate) fn firewall_rule_body(params: &FirewallRuleParams) -> Value {
    json!({
        "properties": {
            "startIpAddress": params.start_ip,
            "endIpAddress": params.end_ip,
        }
    })
}

pub async fn create_or_update_firewall_rule(client: &AzureClient, params: &FirewallRuleParams) -> AzureResult<FirewallRule> {
    let url = rule_url(client, &params.resource_group, &params.server_name, &params.name)?;
    debug!(
        "create_or_update_firewall_rule({}/{}/{}) → {}",
        params.resource_group, params.server_name, params.name, url
    );
    client.put_json(&url, &firewall_rule_body(params)).await
}

pub async fn delete_firewall_rule(client: &AzureClient, rg: &str, server_name: &str, name: &str) -> AzureResult<()> {
    let url = rule_url(client, rg, server_name, name)?;
    debug!("delete_firewall_rule({}/{}/{}) → {}", rg, server_name, name, url);
    client.delete(&url).await
}
