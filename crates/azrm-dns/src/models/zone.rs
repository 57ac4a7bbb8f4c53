use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::models::record_set::RecordSets;
use crate::service::DnsService;
use crate::types::{self, ZoneParams, GLOBAL_LOCATION};

const KIND: &str = "Zone";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_group: Option<String>,
    /// Defaults to `global` on save.
    pub location: Option<String>,
    pub resource_type: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub etag: Option<String>,
    pub number_of_record_sets: Option<u64>,
    pub max_number_of_record_sets: Option<u64>,
    pub name_servers: Option<Vec<String>>,
}

impl Attributes for ZoneAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct Zone {
    service: Arc<dyn DnsService>,
    pub attributes: ZoneAttributes,
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl Zone {
    pub fn new(service: Arc<dyn DnsService>, attributes: ZoneAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(zone: &types::Zone) -> ZoneAttributes {
        let p = &zone.properties;
        ZoneAttributes {
            id: Some(zone.id.clone()),
            name: Some(zone.name.clone()),
            resource_group: resource_group_from_id(&zone.id),
            location: zone.location.clone(),
            resource_type: zone.resource_type.clone(),
            tags: zone.tags.clone(),
            etag: zone.etag.clone(),
            number_of_record_sets: p.number_of_record_sets,
            max_number_of_record_sets: p.max_number_of_record_sets,
            name_servers: p.name_servers.clone(),
        }
    }

    fn zone_params(&self) -> AzureResult<ZoneParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("resource_group", &a.resource_group)
            .check()?;
        Ok(ZoneParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: a.location.clone().unwrap_or_else(|| GLOBAL_LOCATION.to_string()),
            tags: a.tags.clone().unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.zone_params()?;
        let zone = self.service.create_or_update_zone(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&zone));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_zone(rg, name).await
    }

    /// Record sets of one type in this zone.
    pub fn record_sets(&self, record_type: impl Into<String>) -> AzureResult<RecordSets> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        Ok(RecordSets::new(self.service.clone()).in_zone(rg, name, record_type))
    }
}

pub struct Zones {
    service: Arc<dyn DnsService>,
    loaded: Vec<Zone>,
}

impl Zones {
    pub fn new(service: Arc<dyn DnsService>) -> Self {
        Self {
            service,
            loaded: Vec::new(),
        }
    }

    pub async fn all(&mut self) -> AzureResult<&[Zone]> {
        let zones = self.service.list_zones().await?;
        self.loaded = zones
            .iter()
            .map(|z| Zone::new(self.service.clone(), Zone::parse(z)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<Zone> {
        let zone = self.service.get_zone(resource_group, name).await?;
        Ok(Zone::new(self.service.clone(), Zone::parse(&zone)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&Zone> {
        self.loaded
            .iter()
            .find(|z| z.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[Zone] {
        &self.loaded
    }

    pub async fn create(&self, attributes: ZoneAttributes) -> AzureResult<Zone> {
        let mut zone = Zone::new(self.service.clone(), attributes);
        zone.save().await?;
        Ok(zone)
    }

    pub async fn check_zone_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_zone_exists(resource_group, name).await
    }
}
