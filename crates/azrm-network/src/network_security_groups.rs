//! Azure Network Security Groups and their rules.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureError, AzureErrorKind, AzureResult};

use crate::models::network_security_rule::NetworkSecurityRuleAttributes;
use crate::types::{NetworkSecurityGroup, NetworkSecurityGroupParams, SecurityRule};

fn nsg_url(client: &AzureClient, resource_group: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_network;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Network/networkSecurityGroups/{}?api-version={}",
            name, api
        ),
    )
}

fn wire_rules(rules: &[NetworkSecurityRuleAttributes]) -> AzureResult<Vec<SecurityRule>> {
    rules.iter().map(NetworkSecurityRuleAttributes::to_wire).collect()
}

pub async fn list_network_security_groups(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<NetworkSecurityGroup>> {
    let api = &client.config().api_version_network;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Network/networkSecurityGroups?api-version={}", api),
    )?;
    debug!("list_network_security_groups({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_network_security_group(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<NetworkSecurityGroup> {
    let url = nsg_url(client, resource_group, name)?;
    debug!("get_network_security_group({}/{}) → {}", resource_group, name, url);
    client.get_json(&url).await
}

pub async fn check_network_security_group_exists(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<bool> {
    let url = nsg_url(client, resource_group, name)?;
    client.exists(&url).await
}

pub async fn create_or_update_network_security_group(
    client: &AzureClient,
    params: &NetworkSecurityGroupParams,
) -> AzureResult<NetworkSecurityGroup> {
    let url = nsg_url(client, &params.resource_group, &params.name)?;
    debug!(
        "create_or_update_network_security_group({}/{}) → {}",
        params.resource_group, params.name, url
    );
    let body = json!({
        "location": params.location,
        "properties": { "securityRules": wire_rules(&params.security_rules)? }
    });
    client.put_json(&url, &body).await
}

pub async fn delete_network_security_group(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
) -> AzureResult<()> {
    let url = nsg_url(client, resource_group, name)?;
    debug!("delete_network_security_group({}/{}) → {}", resource_group, name, url);
    client.delete(&url).await
}

fn security_rules_mut(body: &mut Value) -> AzureResult<&mut Vec<Value>> {
    let props = body
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| AzureError::new(AzureErrorKind::Parse, "security group payload has no properties"))?;
    let rules = props
        .entry("securityRules".to_string())
        .or_insert_with(|| json!([]));
    if !rules.is_array() {
        *rules = json!([]);
    }
    rules
        .as_array_mut()
        .ok_or_else(|| AzureError::new(AzureErrorKind::Parse, "securityRules is not an array"))
}

/// Rules with an existing name are replaced, the rest appended.
pub(crate) fn merge_security_rules(body: &mut Value, rules: &[SecurityRule]) -> AzureResult<()> {
    let list = security_rules_mut(body)?;
    for rule in rules {
        list.retain(|r| r["name"].as_str() != Some(rule.name.as_str()));
        list.push(serde_json::to_value(rule).map_err(|e| AzureError::parse("security rule", e))?);
    }
    Ok(())
}

pub(crate) fn drop_security_rule(body: &mut Value, rule_name: &str) -> AzureResult<()> {
    security_rules_mut(body)?.retain(|r| r["name"].as_str() != Some(rule_name));
    Ok(())
}

pub async fn add_security_rules(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    rules: &[NetworkSecurityRuleAttributes],
) -> AzureResult<NetworkSecurityGroup> {
    let url = nsg_url(client, resource_group, name)?;
    debug!("add_security_rules({}/{}) {} rule(s)", resource_group, name, rules.len());
    let wire = wire_rules(rules)?;
    let mut body: Value = client.get_json(&url).await?;
    merge_security_rules(&mut body, &wire)?;
    client.put_json(&url, &body).await
}

pub async fn remove_security_rule(
    client: &AzureClient,
    resource_group: &str,
    name: &str,
    rule_name: &str,
) -> AzureResult<NetworkSecurityGroup> {
    let url = nsg_url(client, resource_group, name)?;
    debug!("remove_security_rule({}/{}) {}", resource_group, name, rule_name);
    let mut body: Value = client.get_json(&url).await?;
    drop_security_rule(&mut body, rule_name)?;
    client.put_json(&url, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecurityRuleProperties;

    fn wire(name: &str, priority: u32) -> SecurityRule {
        SecurityRule {
            id: None,
            name: name.into(),
            properties: SecurityRuleProperties {
                protocol: Some("Tcp".into()),
                priority: Some(priority),
                ..Default::default()
            },
        }
    }

    #[test]
    fn merge_replaces_by_name_and_appends() {
        let mut body = json!({
            "name": "nsg1",
            "properties": {
                "securityRules": [
                    { "name": "testRule", "properties": { "priority": 100 } },
                    { "name": "other", "properties": { "priority": 200 } }
                ]
            }
        });
        merge_security_rules(&mut body, &[wire("testRule", 110), wire("new", 300)]).unwrap();
        let rules = body["properties"]["securityRules"].as_array().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0]["name"], "other");
        assert_eq!(rules[1]["properties"]["priority"], 110);
        assert_eq!(rules[2]["name"], "new");

        drop_security_rule(&mut body, "testRule").unwrap();
        assert_eq!(body["properties"]["securityRules"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn merge_creates_rule_list() {
        let mut body = json!({ "properties": {} });
        merge_security_rules(&mut body, &[wire("a", 100)]).unwrap();
        assert_eq!(body["properties"]["securityRules"][0]["name"], "a");
    }
}
