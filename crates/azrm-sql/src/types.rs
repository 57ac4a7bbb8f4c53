//! Wire types for `Microsoft.Sql` and the parameter structs the models build.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

// ─── Servers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SqlServer {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    pub properties: SqlServerProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SqlServerProperties {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub administrator_login: Option<String>,
    #[serde(default)]
    pub fully_qualified_domain_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlServerParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub version: String,
    pub administrator_login: String,
    pub administrator_login_password: String,
}

// ─── Databases ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SqlDatabase {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: SqlDatabaseProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SqlDatabaseProperties {
    #[serde(default)]
    pub create_mode: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub collation: Option<String>,
    /// Older API versions send this as a string.
    #[serde(default, deserialize_with = "number_or_string")]
    pub max_size_bytes: Option<u64>,
    #[serde(default)]
    pub requested_service_objective_name: Option<String>,
    #[serde(default)]
    pub elastic_pool_name: Option<String>,
    #[serde(default)]
    pub source_database_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }
    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlDatabaseParams {
    pub resource_group: String,
    pub server_name: String,
    pub name: String,
    pub location: String,
    pub create_mode: Option<String>,
    pub edition: Option<String>,
    pub collation: Option<String>,
    pub max_size_bytes: Option<u64>,
    pub requested_service_objective_name: Option<String>,
    pub elastic_pool_name: Option<String>,
    pub source_database_id: Option<String>,
}

// ─── Firewall rules ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FirewallRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: FirewallRuleProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleProperties {
    #[serde(default)]
    pub start_ip_address: Option<String>,
    #[serde(default)]
    pub end_ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirewallRuleParams {
    pub resource_group: String,
    pub server_name: String,
    pub name: String,
    pub start_ip: String,
    pub end_ip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_deserialize() {
        let json = r#"{"id":"x","name":"srv1","location":"eastus","type":"Microsoft.Sql/servers",
            "properties":{"fullyQualifiedDomainName":"srv1.database.windows.net","state":"Ready","administratorLogin":"admin1","version":"12.0"}}"#;
        let s: SqlServer = serde_json::from_str(json).unwrap();
        assert_eq!(s.resource_type.as_deref(), Some("Microsoft.Sql/servers"));
        assert_eq!(s.properties.administrator_login.as_deref(), Some("admin1"));
    }

    #[test]
    fn server_requires_properties() {
        assert!(serde_json::from_str::<SqlServer>(r#"{"id":"x","name":"n","location":"l"}"#).is_err());
    }

    #[test]
    fn max_size_accepts_number_or_string() {
        let as_number: SqlDatabaseProperties = serde_json::from_str(r#"{"maxSizeBytes": 1073741824}"#).unwrap();
        let as_text: SqlDatabaseProperties = serde_json::from_str(r#"{"maxSizeBytes": "1073741824"}"#).unwrap();
        let absent: SqlDatabaseProperties = serde_json::from_str("{}").unwrap();
        assert_eq!(as_number.max_size_bytes, Some(1_073_741_824));
        assert_eq!(as_text.max_size_bytes, as_number.max_size_bytes);
        assert_eq!(absent.max_size_bytes, None);
        assert!(serde_json::from_str::<SqlDatabaseProperties>(r#"{"maxSizeBytes": "lots"}"#).is_err());
    }
}
