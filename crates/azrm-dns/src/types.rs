//! Wire types for `Microsoft.Network/dnsZones` and their record sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// DNS zones are not regional; ARM expects this literal location.
pub const GLOBAL_LOCATION: &str = "global";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: ZoneProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneProperties {
    #[serde(default)]
    pub max_number_of_record_sets: Option<u64>,
    #[serde(default)]
    pub number_of_record_sets: Option<u64>,
    #[serde(default)]
    pub name_servers: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RecordSet {
    pub id: String,
    pub name: String,
    /// `Microsoft.Network/dnszones/A`
    #[serde(rename = "type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub properties: RecordSetProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RecordSetProperties {
    #[serde(rename = "TTL", default)]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub fqdn: Option<String>,
    #[serde(rename = "ARecords", default)]
    pub a_records: Option<Vec<ARecord>>,
    #[serde(rename = "CNAMERecord", default)]
    pub cname_record: Option<CnameRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ARecord {
    pub ipv4_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CnameRecord {
    pub cname: String,
}

impl RecordSet {
    /// Last segment of the `type` field, falling back to the id segment
    /// between the zone name and the record set name.
    pub fn record_type(&self) -> Option<String> {
        self.resource_type
            .as_deref()
            .and_then(|t| t.rsplit('/').next())
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("dnszones"))
            .map(str::to_string)
            .or_else(|| {
                let parts: Vec<&str> = self.id.split('/').collect();
                parts
                    .iter()
                    .position(|p| p.eq_ignore_ascii_case("dnszones"))
                    .and_then(|i| parts.get(i + 2))
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
            })
    }

    /// Record payloads as plain strings: IPv4 addresses for `A`, the target for `CNAME`.
    pub fn records(&self) -> Vec<String> {
        let p = &self.properties;
        match self.record_type().as_deref() {
            Some("A") => p
                .a_records
                .iter()
                .flatten()
                .map(|r| r.ipv4_address.clone())
                .collect(),
            Some("CNAME") => p.cname_record.iter().map(|r| r.cname.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSetParams {
    pub resource_group: String,
    pub zone_name: String,
    pub name: String,
    pub record_type: String,
    pub ttl: u64,
    pub records: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use azrm_core::ArmList;

    const RECORD_SET: &str = r#"{
        "id": "/subscriptions/s/resourceGroups/fog-test-rg/providers/Microsoft.Network/dnszones/fog-test-zone.com/A/fog-test-record_set",
        "name": "fog-test-record_set",
        "type": "Microsoft.Network/dnszones/A",
        "etag": "3376a38f-a53f-4ed0-a2e7-dfaba67dbb40",
        "location": "global",
        "properties": {
            "metadata": null,
            "fqdn": "fog-test-record_set.fog-test-zone.com.",
            "TTL": 60,
            "ARecords": [{ "ipv4Address": "1.2.3.4" }, { "ipv4Address": "1.2.3.3" }]
        }
    }"#;

    #[test]
    fn a_record_set_deserialization() {
        let rs: RecordSet = serde_json::from_str(RECORD_SET).unwrap();
        assert_eq!(rs.properties.ttl, Some(60));
        assert_eq!(rs.record_type().as_deref(), Some("A"));
        assert_eq!(rs.records(), vec!["1.2.3.4", "1.2.3.3"]);
    }

    #[test]
    fn cname_record_set_without_type_field() {
        let json = r#"{
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/dnsZones/z.com/CNAME/www",
            "name": "www",
            "properties": { "TTL": 300, "CNAMERecord": { "cname": "z.com" } }
        }"#;
        let rs: RecordSet = serde_json::from_str(json).unwrap();
        assert_eq!(rs.record_type().as_deref(), Some("CNAME"));
        assert_eq!(rs.records(), vec!["z.com"]);
    }

    #[test]
    fn zone_list_deserialization() {
        let json = r#"{"value":[{
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/dnszones/z.com",
            "name": "z.com",
            "type": "Microsoft.Network/dnszones",
            "location": "global",
            "etag": "00000002-0000-0000-76c2-f7ad90b5d101",
            "properties": {
                "maxNumberOfRecordSets": 5000,
                "numberOfRecordSets": 2,
                "nameServers": ["ns1-01.azure-dns.com.", "ns2-01.azure-dns.net."]
            }
        }]}"#;
        let list: ArmList<Zone> = serde_json::from_str(json).unwrap();
        let zone = &list.value[0];
        assert_eq!(zone.properties.max_number_of_record_sets, Some(5000));
        assert_eq!(zone.properties.name_servers.as_ref().map(Vec::len), Some(2));
    }
}
