use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::ResourcesService;
use crate::types;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroupAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub tags: Option<HashMap<String, String>>,
    pub provisioning_state: Option<String>,
}

impl Attributes for ResourceGroupAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct ResourceGroup {
    service: Arc<dyn ResourcesService>,
    pub attributes: ResourceGroupAttributes,
}

impl fmt::Debug for ResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceGroup")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl ResourceGroup {
    pub fn new(service: Arc<dyn ResourcesService>, attributes: ResourceGroupAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(rg: &types::ResourceGroup) -> ResourceGroupAttributes {
        ResourceGroupAttributes {
            id: Some(rg.id.clone()),
            name: Some(rg.name.clone()),
            location: Some(rg.location.clone()),
            tags: rg.tags.clone(),
            provisioning_state: rg
                .properties
                .as_ref()
                .and_then(|p| p.provisioning_state.clone()),
        }
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let a = &self.attributes;
        Requires::new("ResourceGroup")
            .field("name", &a.name)
            .field("location", &a.location)
            .check()?;
        let name = require("ResourceGroup", "name", &a.name)?;
        let location = require("ResourceGroup", "location", &a.location)?;
        let tags = a.tags.clone().unwrap_or_default();

        let created = self
            .service
            .create_resource_group(name, location, &tags)
            .await?;
        info!("resource group {} saved", created.name);
        self.attributes = self.attributes.apply(Self::parse(&created));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let name = require("ResourceGroup", "name", &self.attributes.name)?;
        self.service.delete_resource_group(name).await
    }
}

/// All resource groups of the subscription.
pub struct ResourceGroups {
    service: Arc<dyn ResourcesService>,
    loaded: Vec<ResourceGroup>,
}

impl ResourceGroups {
    pub fn new(service: Arc<dyn ResourcesService>) -> Self {
        Self {
            service,
            loaded: Vec::new(),
        }
    }

    pub async fn all(&mut self) -> AzureResult<&[ResourceGroup]> {
        let groups = self.service.list_resource_groups().await?;
        self.loaded = groups
            .iter()
            .map(|rg| ResourceGroup::new(self.service.clone(), ResourceGroup::parse(rg)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, name: &str) -> AzureResult<ResourceGroup> {
        let rg = self.service.get_resource_group(name).await?;
        Ok(ResourceGroup::new(self.service.clone(), ResourceGroup::parse(&rg)))
    }

    /// Search the sequence loaded by the last `all` without a remote call.
    pub fn find_loaded(&self, name: &str) -> Option<&ResourceGroup> {
        self.loaded
            .iter()
            .find(|rg| rg.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[ResourceGroup] {
        &self.loaded
    }

    pub async fn create(&self, attributes: ResourceGroupAttributes) -> AzureResult<ResourceGroup> {
        let mut rg = ResourceGroup::new(self.service.clone(), attributes);
        rg.save().await?;
        Ok(rg)
    }

    pub async fn check_resource_group_exists(&self, name: &str) -> AzureResult<bool> {
        self.service.check_resource_group_exists(name).await
    }
}
