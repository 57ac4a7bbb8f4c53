//! Record sets inside a DNS zone, addressed by `{zone}/{type}/{name}`.

use log::debug;
use serde_json::{json, Value};

use azrm_core::{AzureClient, AzureError, AzureErrorKind, AzureResult};

use crate::types::{RecordSet, RecordSetParams};
use crate::zones::zone_url;

fn record_set_url(client: &AzureClient, rg: &str, zone_name: &str, record_type: &str, name: &str) -> AzureResult<String> {
    zone_url(client, rg, zone_name, &format!("/{}/{}", record_type, name))
}

pub async fn list_record_sets(
    client: &AzureClient,
    rg: &str,
    zone_name: &str,
    record_type: &str,
) -> AzureResult<Vec<RecordSet>> {
    let url = zone_url(client, rg, zone_name, &format!("/{}", record_type))?;
    debug!("list_record_sets({}/{}/{}) → {}", rg, zone_name, record_type, url);
    client.get_all_pages(&url).await
}

pub async fn get_record_set(
    client: &AzureClient,
    rg: &str,
    zone_name: &str,
    name: &str,
    record_type: &str,
) -> AzureResult<RecordSet> {
    let url = record_set_url(client, rg, zone_name, record_type, name)?;
    debug!("get_record_set({}/{}/{}/{}) → {}", rg, zone_name, record_type, name, url);
    client.get_json(&url).await
}

/// Only `A` and `CNAME` payloads can be expressed; `CNAME` takes exactly one target.
pub(crate) fn record_set_body(params: &RecordSetParams) -> AzureResult<Value> {
    match params.record_type.as_str() {
        "A" => {
            let records: Vec<Value> = params
                .records
                .iter()
                .map(|ip| json!({ "ipv4Address": ip }))
                .collect();
            Ok(json!({ "properties": { "TTL": params.ttl, "ARecords": records } }))
        }
        "CNAME" => match params.records.as_slice() {
            [target] => Ok(json!({ "properties": { "TTL": params.ttl, "CNAMERecord": { "cname": target } } })),
            _ => Err(AzureError::new(
                AzureErrorKind::Validation,
                format!("CNAME record set {} must have exactly one record", params.name),
            )),
        },
        other => Err(AzureError::new(
            AzureErrorKind::Validation,
            format!("Unsupported record type: {}", other),
        )),
    }
}

pub async fn create_or_update_record_set(client: &AzureClient, params: &RecordSetParams) -> AzureResult<RecordSet> {
    let body = record_set_body(params)?;
    let url = record_set_url(
        client,
        &params.resource_group,
        &params.zone_name,
        &params.record_type,
        &params.name,
    )?;
    debug!(
        "create_or_update_record_set({}/{}/{}/{}) → {}",
        params.resource_group, params.zone_name, params.record_type, params.name, url
    );
    client.put_json(&url, &body).await
}

pub async fn delete_record_set(
    client: &AzureClient,
    rg: &str,
    zone_name: &str,
    name: &str,
    record_type: &str,
) -> AzureResult<()> {
    let url = record_set_url(client, rg, zone_name, record_type, name)?;
    debug!("delete_record_set({}/{}/{}/{}) → {}", rg, zone_name, record_type, name, url);
    client.delete(&url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(record_type: &str, records: &[&str]) -> RecordSetParams {
        RecordSetParams {
            resource_group: "rg".into(),
            zone_name: "example.com".into(),
            name: "www".into(),
            record_type: record_type.into(),
            ttl: 60,
            records: records.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn a_body() {
        let body = record_set_body(&params("A", &["1.2.3.4", "1.2.3.3"])).unwrap();
        assert_eq!(
            body,
            json!({ "properties": { "TTL": 60, "ARecords": [
                { "ipv4Address": "1.2.3.4" }, { "ipv4Address": "1.2.3.3" }
            ] } })
        );
    }

    #[test]
    fn cname_body_takes_single_target() {
        let body = record_set_body(&params("CNAME", &["example.net"])).unwrap();
        assert_eq!(body["properties"]["CNAMERecord"]["cname"], "example.net");

        let err = record_set_body(&params("CNAME", &["a.net", "b.net"])).unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Validation);
    }

    #[test]
    fn other_types_rejected() {
        let err = record_set_body(&params("MX", &["mail.example.com"])).unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Validation);
    }
}
