//! Public API exercised against an in-memory DNS service.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_test::assert_ok;

use azrm::dns::types::{
    ARecord, CnameRecord, RecordSet, RecordSetParams, RecordSetProperties, Zone, ZoneParams,
    ZoneProperties,
};
use azrm::dns::{DnsService, RecordSetAttributes, RecordSets, ZoneAttributes, Zones};
use azrm::{AzureConfig, AzureCredentials, AzureError, AzureErrorKind, AzureResult, AzureRm};

type RecordKey = (String, String, String, String);

#[derive(Default)]
struct InMemoryDns {
    zones: Mutex<BTreeMap<(String, String), Zone>>,
    record_sets: Mutex<BTreeMap<RecordKey, RecordSet>>,
    puts: Mutex<usize>,
}

fn not_found(what: &str) -> AzureError {
    AzureError::with_status(AzureErrorKind::NotFound, format!("{} not found", what), 404)
}

fn zone_id(rg: &str, name: &str) -> String {
    format!("/subscriptions/sub1/resourceGroups/{rg}/providers/Microsoft.Network/dnszones/{name}")
}

#[async_trait]
impl DnsService for InMemoryDns {
    async fn list_zones(&self) -> AzureResult<Vec<Zone>> {
        Ok(self.zones.lock().unwrap().values().cloned().collect())
    }

    async fn get_zone(&self, resource_group: &str, name: &str) -> AzureResult<Zone> {
        self.zones
            .lock()
            .unwrap()
            .get(&(resource_group.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn check_zone_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        match self.get_zone(resource_group, name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_or_update_zone(&self, params: &ZoneParams) -> AzureResult<Zone> {
        *self.puts.lock().unwrap() += 1;
        let zone = Zone {
            id: zone_id(&params.resource_group, &params.name),
            name: params.name.clone(),
            location: Some(params.location.clone()),
            resource_type: Some("Microsoft.Network/dnszones".into()),
            etag: Some("etag-1".into()),
            tags: Some(params.tags.clone()),
            properties: ZoneProperties {
                max_number_of_record_sets: Some(5000),
                number_of_record_sets: Some(2),
                name_servers: Some(vec!["ns1-01.azure-dns.com.".into()]),
            },
        };
        self.zones
            .lock()
            .unwrap()
            .insert((params.resource_group.clone(), params.name.clone()), zone.clone());
        Ok(zone)
    }

    async fn delete_zone(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.zones
            .lock()
            .unwrap()
            .remove(&(resource_group.to_string(), name.to_string()))
            .map(|_| true)
            .ok_or_else(|| not_found(name))
    }

    async fn list_record_sets(&self, resource_group: &str, zone_name: &str, record_type: &str) -> AzureResult<Vec<RecordSet>> {
        Ok(self
            .record_sets
            .lock()
            .unwrap()
            .iter()
            .filter(|((rg, zone, t, _), _)| rg == resource_group && zone == zone_name && t == record_type)
            .map(|(_, rs)| rs.clone())
            .collect())
    }

    async fn get_record_set(&self, resource_group: &str, zone_name: &str, name: &str, record_type: &str) -> AzureResult<RecordSet> {
        let key = (resource_group.into(), zone_name.into(), record_type.into(), name.into());
        self.record_sets
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn create_or_update_record_set(&self, params: &RecordSetParams) -> AzureResult<RecordSet> {
        *self.puts.lock().unwrap() += 1;
        let (a_records, cname_record) = match params.record_type.as_str() {
            "A" => (
                Some(
                    params
                        .records
                        .iter()
                        .map(|ip| ARecord { ipv4_address: ip.clone() })
                        .collect(),
                ),
                None,
            ),
            _ => (
                None,
                params.records.first().map(|c| CnameRecord { cname: c.clone() }),
            ),
        };
        let record_set = RecordSet {
            id: format!(
                "{}/{}/{}",
                zone_id(&params.resource_group, &params.zone_name),
                params.record_type,
                params.name
            ),
            name: params.name.clone(),
            resource_type: Some(format!("Microsoft.Network/dnszones/{}", params.record_type)),
            etag: None,
            properties: RecordSetProperties {
                ttl: Some(params.ttl),
                fqdn: Some(format!("{}.{}.", params.name, params.zone_name)),
                a_records,
                cname_record,
            },
        };
        let key = (
            params.resource_group.clone(),
            params.zone_name.clone(),
            params.record_type.clone(),
            params.name.clone(),
        );
        self.record_sets.lock().unwrap().insert(key, record_set.clone());
        Ok(record_set)
    }

    async fn delete_record_set(&self, resource_group: &str, zone_name: &str, name: &str, record_type: &str) -> AzureResult<bool> {
        let key = (resource_group.into(), zone_name.into(), record_type.into(), name.into());
        Ok(self.record_sets.lock().unwrap().remove(&key).is_some())
    }
}

#[tokio::test]
async fn zone_and_record_set_lifecycle() {
    let dns = Arc::new(InMemoryDns::default());
    let service: Arc<dyn DnsService> = dns.clone();
    let mut zones = Zones::new(service.clone());

    let zone = zones
        .create(ZoneAttributes {
            name: Some("fog-test-zone.com".into()),
            resource_group: Some("fog-test-rg".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(zone.attributes.location.as_deref(), Some("global"));
    assert!(zones.check_zone_exists("fog-test-rg", "fog-test-zone.com").await.unwrap());
    assert!(!zones.check_zone_exists("fog-test-rg", "other.com").await.unwrap());

    let mut a_sets = zone.record_sets("A").unwrap();
    let mut web = a_sets
        .create(RecordSetAttributes {
            name: Some("web".into()),
            resource_group: Some("fog-test-rg".into()),
            zone_name: Some("fog-test-zone.com".into()),
            record_type: Some("A".into()),
            ttl: Some(60),
            records: Some(vec!["1.2.3.4".into()]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_ok!(web.add_a_type_record("1.2.3.3").await);
    assert_ok!(web.update_ttl(300).await);
    assert_ok!(web.remove_a_type_record("1.2.3.4").await);
    assert_eq!(web.attributes.records, Some(vec!["1.2.3.3".to_string()]));

    let fetched = a_sets
        .get("fog-test-rg", "fog-test-zone.com", "web", "A")
        .await
        .unwrap();
    assert_eq!(fetched.attributes, web.attributes);
    assert_eq!(fetched.attributes.ttl, Some(300));
    assert_eq!(a_sets.all().await.unwrap().len(), 1);

    let snapshot = serde_json::to_value(&web.attributes).unwrap();
    assert_eq!(snapshot["fqdn"], "web.fog-test-zone.com.");
    assert_eq!(snapshot["records"], serde_json::json!(["1.2.3.3"]));

    assert!(web.destroy().await.unwrap());
    assert!(a_sets.all().await.unwrap().is_empty());

    assert_eq!(zones.all().await.unwrap().len(), 1);
    assert!(zones.find_loaded("fog-test-zone.com").unwrap().destroy().await.unwrap());
    assert!(zones.all().await.unwrap().is_empty());
    // zone + create + add + ttl + remove
    assert_eq!(*dns.puts.lock().unwrap(), 5);
}

#[tokio::test]
async fn invalid_models_never_reach_the_service() {
    let dns = Arc::new(InMemoryDns::default());
    let mut record_sets = RecordSets::new(dns.clone()).in_zone("rg", "z.com", "CNAME");

    let err = record_sets
        .create(RecordSetAttributes {
            name: Some("www".into()),
            record_type: Some("CNAME".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, AzureErrorKind::MissingAttribute);
    assert_eq!(
        err.message,
        "RecordSet is missing required attribute(s): resource_group, zone_name, ttl, records"
    );
    assert_eq!(*dns.puts.lock().unwrap(), 0);
    assert!(record_sets.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn facade_reports_missing_subscription_before_any_request() {
    let rm = AzureRm::new(AzureCredentials::default(), AzureConfig::new());
    let mut zones = rm.zones();
    let err = zones.all().await.unwrap_err();
    assert_eq!(err.kind, AzureErrorKind::SubscriptionNotSet);

    let mut groups = rm.resource_groups();
    assert_eq!(
        groups.all().await.unwrap_err().kind,
        AzureErrorKind::SubscriptionNotSet
    );
}
