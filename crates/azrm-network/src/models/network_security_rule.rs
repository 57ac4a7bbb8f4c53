use serde::{Deserialize, Serialize};

use azrm_core::{AzureResult, Requires};

use crate::types::{SecurityRule, SecurityRuleProperties};

const KIND: &str = "NetworkSecurityRule";

/// One rule of a network security group. Saved through its group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSecurityRuleAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub protocol: Option<String>,
    pub source_port_range: Option<String>,
    pub destination_port_range: Option<String>,
    pub source_address_prefix: Option<String>,
    pub destination_address_prefix: Option<String>,
    pub access: Option<String>,
    pub priority: Option<u32>,
    pub direction: Option<String>,
}

impl NetworkSecurityRuleAttributes {
    pub fn parse(rule: &SecurityRule) -> Self {
        let p = &rule.properties;
        Self {
            id: rule.id.clone(),
            name: Some(rule.name.clone()),
            description: p.description.clone(),
            protocol: p.protocol.clone(),
            source_port_range: p.source_port_range.clone(),
            destination_port_range: p.destination_port_range.clone(),
            source_address_prefix: p.source_address_prefix.clone(),
            destination_address_prefix: p.destination_address_prefix.clone(),
            access: p.access.clone(),
            priority: p.priority,
            direction: p.direction.clone(),
        }
    }

    /// Wire form of the rule; every field ARM requires must be set.
    pub fn to_wire(&self) -> AzureResult<SecurityRule> {
        Requires::new(KIND)
            .field("name", &self.name)
            .field("protocol", &self.protocol)
            .field("source_port_range", &self.source_port_range)
            .field("destination_port_range", &self.destination_port_range)
            .field("source_address_prefix", &self.source_address_prefix)
            .field("destination_address_prefix", &self.destination_address_prefix)
            .field("access", &self.access)
            .field("priority", &self.priority)
            .field("direction", &self.direction)
            .check()?;
        Ok(SecurityRule {
            id: None,
            name: self.name.clone().unwrap_or_default(),
            properties: SecurityRuleProperties {
                description: self.description.clone(),
                protocol: self.protocol.clone(),
                source_port_range: self.source_port_range.clone(),
                destination_port_range: self.destination_port_range.clone(),
                source_address_prefix: self.source_address_prefix.clone(),
                destination_address_prefix: self.destination_address_prefix.clone(),
                access: self.access.clone(),
                priority: self.priority,
                direction: self.direction.clone(),
                provisioning_state: None,
            },
        })
    }
}
