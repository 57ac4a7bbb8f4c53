use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::{resource_group_from_id, segment_after};
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::SqlService;
use crate::types::{self, FirewallRuleParams};

const KIND: &str = "FirewallRule";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirewallRuleAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_group: Option<String>,
    pub server_name: Option<String>,
    pub start_ip: Option<String>,
    pub end_ip: Option<String>,
}

impl Attributes for FirewallRuleAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct FirewallRule {
    service: Arc<dyn SqlService>,
    pub attributes: FirewallRuleAttributes,
}

impl fmt::Debug for FirewallRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirewallRule")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl FirewallRule {
    pub fn new(service: Arc<dyn SqlService>, attributes: FirewallRuleAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(rule: &types::FirewallRule) -> FirewallRuleAttributes {
        FirewallRuleAttributes {
            id: Some(rule.id.clone()),
            name: Some(rule.name.clone()),
            resource_group: resource_group_from_id(&rule.id),
            server_name: segment_after(&rule.id, "servers"),
            start_ip: rule.properties.start_ip_address.clone(),
            end_ip: rule.properties.end_ip_address.clone(),
        }
    }

    fn rule_params(&self) -> AzureResult<FirewallRuleParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("resource_group", &a.resource_group)
            .field("server_name", &a.server_name)
            .field("name", &a.name)
            .field("start_ip", &a.start_ip)
            .field("end_ip", &a.end_ip)
            .check()?;
        Ok(FirewallRuleParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            server_name: require(KIND, "server_name", &a.server_name)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            start_ip: require(KIND, "start_ip", &a.start_ip)?.to_string(),
            end_ip: require(KIND, "end_ip", &a.end_ip)?.to_string(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.rule_params()?;
        let rule = self.service.create_or_update_firewall_rule(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&rule));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let server = require(KIND, "server_name", &self.attributes.server_name)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_firewall_rule(rg, server, name).await
    }
}

pub struct FirewallRules {
    service: Arc<dyn SqlService>,
    pub resource_group: Option<String>,
    pub server_name: Option<String>,
    loaded: Vec<FirewallRule>,
}

impl FirewallRules {
    pub fn new(service: Arc<dyn SqlService>) -> Self {
        Self {
            service,
            resource_group: None,
            server_name: None,
            loaded: Vec::new(),
        }
    }

    pub fn in_server(mut self, resource_group: impl Into<String>, server_name: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self.server_name = Some(server_name.into());
        self
    }

    pub async fn all(&mut self) -> AzureResult<&[FirewallRule]> {
        Requires::new("FirewallRules")
            .field("resource_group", &self.resource_group)
            .field("server_name", &self.server_name)
            .check()?;
        let rg = require("FirewallRules", "resource_group", &self.resource_group)?;
        let server = require("FirewallRules", "server_name", &self.server_name)?;
        let rules = self.service.list_firewall_rules(rg, server).await?;
        self.loaded = rules
            .iter()
            .map(|r| FirewallRule::new(self.service.clone(), FirewallRule::parse(r)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, server_name: &str, name: &str) -> AzureResult<FirewallRule> {
        let rule = self
            .service
            .get_firewall_rule(resource_group, server_name, name)
            .await?;
        Ok(FirewallRule::new(self.service.clone(), FirewallRule::parse(&rule)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&FirewallRule> {
        self.loaded
            .iter()
            .find(|r| r.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[FirewallRule] {
        &self.loaded
    }

    pub async fn create(&self, attributes: FirewallRuleAttributes) -> AzureResult<FirewallRule> {
        let mut rule = FirewallRule::new(self.service.clone(), attributes);
        rule.save().await?;
        Ok(rule)
    }
}
