use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::ComputeService;
use crate::types::{self, AvailabilitySetParams};

const KIND: &str = "AvailabilitySet";
const DEFAULT_UPDATE_DOMAIN_COUNT: u32 = 5;
const DEFAULT_FAULT_DOMAIN_COUNT: u32 = 2;
const SKU_ALIGNED: &str = "Aligned";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySetAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub platform_update_domain_count: Option<u32>,
    pub platform_fault_domain_count: Option<u32>,
    pub use_managed_disk: Option<bool>,
}

impl Attributes for AvailabilitySetAttributes {
    fn apply(&self, parsed: Self) -> Self {
        Self {
            platform_update_domain_count: parsed
                .platform_update_domain_count
                .or(self.platform_update_domain_count),
            platform_fault_domain_count: parsed
                .platform_fault_domain_count
                .or(self.platform_fault_domain_count),
            ..parsed
        }
    }
}

pub struct AvailabilitySet {
    service: Arc<dyn ComputeService>,
    pub attributes: AvailabilitySetAttributes,
}

impl fmt::Debug for AvailabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilitySet")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl AvailabilitySet {
    pub fn new(service: Arc<dyn ComputeService>, attributes: AvailabilitySetAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(set: &types::AvailabilitySet) -> AvailabilitySetAttributes {
        let props = set.properties.as_ref();
        AvailabilitySetAttributes {
            id: Some(set.id.clone()),
            name: Some(set.name.clone()),
            location: Some(set.location.clone()),
            resource_group: resource_group_from_id(&set.id),
            tags: set.tags.clone(),
            platform_update_domain_count: props.and_then(|p| p.platform_update_domain_count),
            platform_fault_domain_count: props.and_then(|p| p.platform_fault_domain_count),
            use_managed_disk: Some(
                set.sku
                    .as_ref()
                    .and_then(|s| s.name.as_deref())
                    .map(|n| n.eq_ignore_ascii_case(SKU_ALIGNED))
                    .unwrap_or(false),
            ),
        }
    }

    /// Unset domain counts fall back to 5 update / 2 fault domains.
    pub fn availability_set_params(&self) -> AzureResult<AvailabilitySetParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .check()?;
        Ok(AvailabilitySetParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            platform_update_domain_count: a
                .platform_update_domain_count
                .unwrap_or(DEFAULT_UPDATE_DOMAIN_COUNT),
            platform_fault_domain_count: a
                .platform_fault_domain_count
                .unwrap_or(DEFAULT_FAULT_DOMAIN_COUNT),
            use_managed_disk: a.use_managed_disk.unwrap_or(false),
            tags: a.tags.clone().unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.availability_set_params()?;
        let set = self.service.create_availability_set(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&set));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_availability_set(rg, name).await
    }
}

pub struct AvailabilitySets {
    service: Arc<dyn ComputeService>,
    pub resource_group: Option<String>,
    loaded: Vec<AvailabilitySet>,
}

impl AvailabilitySets {
    pub fn new(service: Arc<dyn ComputeService>) -> Self {
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

    pub async fn all(&mut self) -> AzureResult<&[AvailabilitySet]> {
        let rg = require("AvailabilitySets", "resource_group", &self.resource_group)?;
        let sets = self.service.list_availability_sets(rg).await?;
        self.loaded = sets
            .iter()
            .map(|s| AvailabilitySet::new(self.service.clone(), AvailabilitySet::parse(s)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<AvailabilitySet> {
        let set = self.service.get_availability_set(resource_group, name).await?;
        Ok(AvailabilitySet::new(self.service.clone(), AvailabilitySet::parse(&set)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&AvailabilitySet> {
        self.loaded
            .iter()
            .find(|s| s.attributes.name.as_deref() == Some(name))
    }

    pub async fn create(&self, attributes: AvailabilitySetAttributes) -> AzureResult<AvailabilitySet> {
        let mut set = AvailabilitySet::new(self.service.clone(), attributes);
        set.save().await?;
        Ok(set)
    }

    pub async fn check_availability_set_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_availability_set_exists(resource_group, name).await
    }
}
