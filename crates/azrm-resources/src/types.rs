//! Wire types for `Microsoft.Resources/resourceGroups`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: Option<ResourceGroupProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResourceGroupRequest {
    pub location: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use azrm_core::ArmList;

    #[test]
    fn rg_deserialization() {
        let json = r#"{"id":"/subscriptions/sub1/resourceGroups/rg1","name":"rg1","location":"eastus","tags":{},"properties":{"provisioningState":"Succeeded"}}"#;
        let rg: ResourceGroup = serde_json::from_str(json).unwrap();
        assert_eq!(rg.name, "rg1");
        assert_eq!(
            rg.properties.unwrap().provisioning_state.as_deref(),
            Some("Succeeded")
        );
    }

    #[test]
    fn rg_without_location_is_rejected() {
        let json = r#"{"id":"x","name":"rg1"}"#;
        assert!(serde_json::from_str::<ResourceGroup>(json).is_err());
    }

    #[test]
    fn rg_list_deserialization() {
        let json = r#"{"value":[{"id":"x","name":"rg1","location":"eastus"}]}"#;
        let list: ArmList<ResourceGroup> = serde_json::from_str(json).unwrap();
        assert_eq!(list.value.len(), 1);
        assert!(list.value[0].tags.is_none());
    }

    #[test]
    fn create_request_omits_empty_tags() {
        let r = CreateResourceGroupRequest {
            location: "eastus".into(),
            tags: HashMap::new(),
        };
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"location":"eastus"}"#);
    }
}
