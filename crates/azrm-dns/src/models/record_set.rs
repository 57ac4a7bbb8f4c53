use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use azrm_core::ids::{resource_group_from_id, segment_after};
use azrm_core::{require, Attributes, AzureError, AzureErrorKind, AzureResult, Requires};

use crate::service::DnsService;
use crate::types::{self, RecordSetParams};

const KIND: &str = "RecordSet";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSetAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_group: Option<String>,
    pub zone_name: Option<String>,
    /// `A` or `CNAME`.
    pub record_type: Option<String>,
    pub ttl: Option<u64>,
    pub records: Option<Vec<String>>,
    pub fqdn: Option<String>,
    pub etag: Option<String>,
}

impl Attributes for RecordSetAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct RecordSet {
    service: Arc<dyn DnsService>,
    pub attributes: RecordSetAttributes,
}

impl fmt::Debug for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSet")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl RecordSet {
    pub fn new(service: Arc<dyn DnsService>, attributes: RecordSetAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(record_set: &types::RecordSet) -> RecordSetAttributes {
        RecordSetAttributes {
            id: Some(record_set.id.clone()),
            name: Some(record_set.name.clone()),
            resource_group: resource_group_from_id(&record_set.id),
            zone_name: segment_after(&record_set.id, "dnszones"),
            record_type: record_set.record_type(),
            ttl: record_set.properties.ttl,
            records: Some(record_set.records()),
            fqdn: record_set.properties.fqdn.clone(),
            etag: record_set.etag.clone(),
        }
    }

    fn record_set_params(&self) -> AzureResult<RecordSetParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("resource_group", &a.resource_group)
            .field("zone_name", &a.zone_name)
            .field("record_type", &a.record_type)
            .field("ttl", &a.ttl)
            .field("records", &a.records)
            .check()?;
        Ok(RecordSetParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            zone_name: require(KIND, "zone_name", &a.zone_name)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            record_type: require(KIND, "record_type", &a.record_type)?.to_string(),
            ttl: a.ttl.unwrap_or_default(),
            records: a.records.clone().unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.record_set_params()?;
        let record_set = self.service.create_or_update_record_set(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&record_set));
        Ok(self)
    }

    /// PUTs the record set with a new TTL and the current records.
    pub async fn update_ttl(&mut self, ttl: u64) -> AzureResult<&Self> {
        let mut params = self.record_set_params()?;
        params.ttl = ttl;
        let record_set = self.service.create_or_update_record_set(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&record_set));
        Ok(self)
    }

    pub async fn add_a_type_record(&mut self, ip: &str) -> AzureResult<&Self> {
        let mut params = self.a_record_params()?;
        if params.records.iter().any(|r| r == ip) {
            debug!("{} already present in record set {}", ip, params.name);
        } else {
            params.records.push(ip.to_string());
        }
        let record_set = self.service.create_or_update_record_set(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&record_set));
        Ok(self)
    }

    pub async fn remove_a_type_record(&mut self, ip: &str) -> AzureResult<&Self> {
        let mut params = self.a_record_params()?;
        params.records.retain(|r| r != ip);
        let record_set = self.service.create_or_update_record_set(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&record_set));
        Ok(self)
    }

    fn a_record_params(&self) -> AzureResult<RecordSetParams> {
        let params = self.record_set_params()?;
        if params.record_type != "A" {
            return Err(AzureError::new(
                AzureErrorKind::Validation,
                format!("Record set {} is of type {}, not A", params.name, params.record_type),
            ));
        }
        Ok(params)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let a = &self.attributes;
        let rg = require(KIND, "resource_group", &a.resource_group)?;
        let zone = require(KIND, "zone_name", &a.zone_name)?;
        let name = require(KIND, "name", &a.name)?;
        let record_type = require(KIND, "record_type", &a.record_type)?;
        self.service.delete_record_set(rg, zone, name, record_type).await
    }
}

pub struct RecordSets {
    service: Arc<dyn DnsService>,
    pub resource_group: Option<String>,
    pub zone_name: Option<String>,
    pub record_type: Option<String>,
    loaded: Vec<RecordSet>,
}

impl RecordSets {
    pub fn new(service: Arc<dyn DnsService>) -> Self {
        Self {
            service,
            resource_group: None,
            zone_name: None,
            record_type: None,
            loaded: Vec::new(),
        }
    }

    pub fn in_zone(
        mut self,
        resource_group: impl Into<String>,
        zone_name: impl Into<String>,
        record_type: impl Into<String>,
    ) -> Self {
        self.resource_group = Some(resource_group.into());
        self.zone_name = Some(zone_name.into());
        self.record_type = Some(record_type.into());
        self
    }

    pub async fn all(&mut self) -> AzureResult<&[RecordSet]> {
        Requires::new("RecordSets")
            .field("resource_group", &self.resource_group)
            .field("zone_name", &self.zone_name)
            .field("record_type", &self.record_type)
            .check()?;
        let rg = require("RecordSets", "resource_group", &self.resource_group)?;
        let zone = require("RecordSets", "zone_name", &self.zone_name)?;
        let record_type = require("RecordSets", "record_type", &self.record_type)?;
        let record_sets = self.service.list_record_sets(rg, zone, record_type).await?;
        self.loaded = record_sets
            .iter()
            .map(|r| RecordSet::new(self.service.clone(), RecordSet::parse(r)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, zone_name: &str, name: &str, record_type: &str) -> AzureResult<RecordSet> {
        let record_set = self
            .service
            .get_record_set(resource_group, zone_name, name, record_type)
            .await?;
        Ok(RecordSet::new(self.service.clone(), RecordSet::parse(&record_set)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&RecordSet> {
        self.loaded
            .iter()
            .find(|r| r.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[RecordSet] {
        &self.loaded
    }

    pub async fn create(&self, attributes: RecordSetAttributes) -> AzureResult<RecordSet> {
        let mut record_set = RecordSet::new(self.service.clone(), attributes);
        record_set.save().await?;
        Ok(record_set)
    }
}
