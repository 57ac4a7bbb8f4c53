use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::models::network_security_rule::NetworkSecurityRuleAttributes;
use crate::service::NetworkService;
use crate::types::{self, NetworkSecurityGroupParams};

const KIND: &str = "NetworkSecurityGroup";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSecurityGroupAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub security_rules: Option<Vec<NetworkSecurityRuleAttributes>>,
    pub default_security_rules: Option<Vec<NetworkSecurityRuleAttributes>>,
}

impl Attributes for NetworkSecurityGroupAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct NetworkSecurityGroup {
    service: Arc<dyn NetworkService>,
    pub attributes: NetworkSecurityGroupAttributes,
}

impl fmt::Debug for NetworkSecurityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkSecurityGroup")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl NetworkSecurityGroup {
    pub fn new(service: Arc<dyn NetworkService>, attributes: NetworkSecurityGroupAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(nsg: &types::NetworkSecurityGroup) -> NetworkSecurityGroupAttributes {
        let p = &nsg.properties;
        NetworkSecurityGroupAttributes {
            id: Some(nsg.id.clone()),
            name: Some(nsg.name.clone()),
            location: Some(nsg.location.clone()),
            resource_group: resource_group_from_id(&nsg.id),
            security_rules: Some(p.security_rules.iter().map(NetworkSecurityRuleAttributes::parse).collect()),
            default_security_rules: Some(
                p.default_security_rules
                    .iter()
                    .map(NetworkSecurityRuleAttributes::parse)
                    .collect(),
            ),
        }
    }

    fn security_group_params(&self) -> AzureResult<NetworkSecurityGroupParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .check()?;
        let security_rules = a.security_rules.clone().unwrap_or_default();
        for rule in &security_rules {
            rule.to_wire()?;
        }
        Ok(NetworkSecurityGroupParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            security_rules,
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.security_group_params()?;
        let nsg = self
            .service
            .create_or_update_network_security_group(&params)
            .await?;
        self.attributes = self.attributes.apply(Self::parse(&nsg));
        Ok(self)
    }

    fn identity(&self) -> AzureResult<(&str, &str)> {
        Ok((
            require(KIND, "resource_group", &self.attributes.resource_group)?,
            require(KIND, "name", &self.attributes.name)?,
        ))
    }

    /// Rules are validated locally; a rule whose name already exists replaces it.
    pub async fn add_security_rules(&mut self, rules: &[NetworkSecurityRuleAttributes]) -> AzureResult<&Self> {
        for rule in rules {
            rule.to_wire()?;
        }
        let (rg, name) = self.identity()?;
        let nsg = self.service.add_security_rules(rg, name, rules).await?;
        self.attributes = self.attributes.apply(Self::parse(&nsg));
        Ok(self)
    }

    pub async fn remove_security_rule(&mut self, rule_name: &str) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let nsg = self.service.remove_security_rule(rg, name, rule_name).await?;
        self.attributes = self.attributes.apply(Self::parse(&nsg));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.delete_network_security_group(rg, name).await
    }
}

pub struct NetworkSecurityGroups {
    service: Arc<dyn NetworkService>,
    pub resource_group: Option<String>,
    loaded: Vec<NetworkSecurityGroup>,
}

impl NetworkSecurityGroups {
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

    pub async fn all(&mut self) -> AzureResult<&[NetworkSecurityGroup]> {
        let rg = require("NetworkSecurityGroups", "resource_group", &self.resource_group)?;
        let groups = self.service.list_network_security_groups(rg).await?;
        self.loaded = groups
            .iter()
            .map(|g| NetworkSecurityGroup::new(self.service.clone(), NetworkSecurityGroup::parse(g)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<NetworkSecurityGroup> {
        let nsg = self
            .service
            .get_network_security_group(resource_group, name)
            .await?;
        Ok(NetworkSecurityGroup::new(self.service.clone(), NetworkSecurityGroup::parse(&nsg)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&NetworkSecurityGroup> {
        self.loaded
            .iter()
            .find(|g| g.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[NetworkSecurityGroup] {
        &self.loaded
    }

    pub async fn create(&self, attributes: NetworkSecurityGroupAttributes) -> AzureResult<NetworkSecurityGroup> {
        let mut nsg = NetworkSecurityGroup::new(self.service.clone(), attributes);
        nsg.save().await?;
        Ok(nsg)
    }

    pub async fn check_network_security_group_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service
            .check_network_security_group_exists(resource_group, name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockNetworkService;
    use crate::types::{NsgProperties, SecurityRule, SecurityRuleProperties};

    fn rule(name: &str, priority: u32) -> NetworkSecurityRuleAttributes {
        NetworkSecurityRuleAttributes {
            name: Some(name.into()),
            protocol: Some("Tcp".into()),
            source_port_range: Some("22".into()),
            destination_port_range: Some("22".into()),
            source_address_prefix: Some("0.0.0.0/0".into()),
            destination_address_prefix: Some("0.0.0.0/32".into()),
            access: Some("Allow".into()),
            priority: Some(priority),
            direction: Some("Inbound".into()),
            ..Default::default()
        }
    }

    fn wire(rules: &[(&str, u32)]) -> types::NetworkSecurityGroup {
        types::NetworkSecurityGroup {
            id: "/subscriptions/s/resourceGroups/fog-rg/providers/Microsoft.Network/networkSecurityGroups/fog-nsg".into(),
            name: "fog-nsg".into(),
            location: "westus".into(),
            properties: NsgProperties {
                security_rules: rules
                    .iter()
                    .map(|(name, priority)| SecurityRule {
                        id: Some(format!("rule-{}", name)),
                        name: name.to_string(),
                        properties: SecurityRuleProperties {
                            protocol: Some("Tcp".into()),
                            access: Some("Allow".into()),
                            priority: Some(*priority),
                            direction: Some("Inbound".into()),
                            ..Default::default()
                        },
                    })
                    .collect(),
                default_security_rules: vec![SecurityRule {
                    id: None,
                    name: "AllowVnetInBound".into(),
                    properties: SecurityRuleProperties {
                        priority: Some(65000),
                        ..Default::default()
                    },
                }],
                ..Default::default()
            },
        }
    }

    fn rule_names(nsg: &NetworkSecurityGroup) -> Vec<String> {
        nsg.attributes
            .security_rules
            .iter()
            .flatten()
            .filter_map(|r| r.name.clone())
            .collect()
    }

    #[test]
    fn parse_separates_default_rules() {
        let a = NetworkSecurityGroup::parse(&wire(&[("testRule", 100)]));
        assert_eq!(a.security_rules.as_ref().map(Vec::len), Some(1));
        let defaults = a.default_security_rules.unwrap();
        assert_eq!(defaults[0].priority, Some(65000));
    }

    #[tokio::test]
    async fn create_with_rules() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_network_security_group()
            .withf(|p: &NetworkSecurityGroupParams| p.security_rules.len() == 1 && p.name == "fog-nsg")
            .times(1)
            .returning(|_| Ok(wire(&[("testRule", 100)])));
        let groups = NetworkSecurityGroups::new(Arc::new(mock));
        let nsg = groups
            .create(NetworkSecurityGroupAttributes {
                name: Some("fog-nsg".into()),
                location: Some("westus".into()),
                resource_group: Some("fog-rg".into()),
                security_rules: Some(vec![rule("testRule", 100)]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rule_names(&nsg), vec!["testRule"]);
    }

    #[tokio::test]
    async fn invalid_rule_blocks_save() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_network_security_group().times(0);
        let mut bad = rule("testRule", 100);
        bad.access = None;
        let mut nsg = NetworkSecurityGroup::new(
            Arc::new(mock),
            NetworkSecurityGroupAttributes {
                name: Some("fog-nsg".into()),
                location: Some("westus".into()),
                resource_group: Some("fog-rg".into()),
                security_rules: Some(vec![bad]),
                ..Default::default()
            },
        );
        let err = nsg.save().await.unwrap_err();
        assert!(err.message.starts_with("NetworkSecurityRule"));
        assert!(err.message.ends_with("access"));
    }

    #[tokio::test]
    async fn add_and_remove_rules() {
        let mut mock = MockNetworkService::new();
        mock.expect_add_security_rules()
            .withf(|rg: &str, name: &str, rules: &[NetworkSecurityRuleAttributes]| {
                rg == "fog-rg" && name == "fog-nsg" && rules.len() == 2
            })
            .times(1)
            .returning(|_, _, _| Ok(wire(&[("testRule", 100), ("web", 110), ("https", 120)])));
        mock.expect_remove_security_rule()
            .withf(|_: &str, _: &str, rule: &str| rule == "testRule")
            .times(1)
            .returning(|_, _, _| Ok(wire(&[("web", 110), ("https", 120)])));

        let mut nsg = NetworkSecurityGroup::new(Arc::new(mock), NetworkSecurityGroup::parse(&wire(&[("testRule", 100)])));
        nsg.add_security_rules(&[rule("web", 110), rule("https", 120)]).await.unwrap();
        assert_eq!(rule_names(&nsg), vec!["testRule", "web", "https"]);
        nsg.remove_security_rule("testRule").await.unwrap();
        assert_eq!(rule_names(&nsg), vec!["web", "https"]);
    }

    #[tokio::test]
    async fn add_invalid_rule_makes_no_call() {
        let mut mock = MockNetworkService::new();
        mock.expect_add_security_rules().times(0);
        let mut nsg = NetworkSecurityGroup::new(Arc::new(mock), NetworkSecurityGroup::parse(&wire(&[])));
        let mut bad = rule("web", 110);
        bad.priority = None;
        assert!(nsg.add_security_rules(&[bad]).await.is_err());
    }

    #[tokio::test]
    async fn collection_all_and_destroy() {
        let mut mock = MockNetworkService::new();
        mock.expect_list_network_security_groups()
            .returning(|_| Ok(vec![wire(&[])]));
        mock.expect_delete_network_security_group()
            .times(1)
            .returning(|_, _| Ok(true));
        let mut groups = NetworkSecurityGroups::new(Arc::new(mock)).in_resource_group("fog-rg");
        assert_eq!(groups.all().await.unwrap().len(), 1);
        assert!(groups.find_loaded("fog-nsg").unwrap().destroy().await.unwrap());
    }
}
