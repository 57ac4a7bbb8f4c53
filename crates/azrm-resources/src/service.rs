//! Remote operations the resource group models depend on.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use azrm_core::{AzureClient, AzureResult};

use crate::resource_groups;
use crate::types::{CreateResourceGroupRequest, ResourceGroup};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourcesService: Send + Sync {
    async fn list_resource_groups(&self) -> AzureResult<Vec<ResourceGroup>>;
    async fn get_resource_group(&self, name: &str) -> AzureResult<ResourceGroup>;
    async fn create_resource_group(
        &self,
        name: &str,
        location: &str,
        tags: &HashMap<String, String>,
    ) -> AzureResult<ResourceGroup>;
    async fn delete_resource_group(&self, name: &str) -> AzureResult<bool>;
    async fn check_resource_group_exists(&self, name: &str) -> AzureResult<bool>;
}

/// `ResourcesService` backed by the ARM REST API.
pub struct ArmResourcesService {
    client: Arc<AzureClient>,
}

impl ArmResourcesService {
    pub fn new(client: Arc<AzureClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourcesService for ArmResourcesService {
    async fn list_resource_groups(&self) -> AzureResult<Vec<ResourceGroup>> {
        resource_groups::list_resource_groups(&self.client).await
    }

    async fn get_resource_group(&self, name: &str) -> AzureResult<ResourceGroup> {
        resource_groups::get_resource_group(&self.client, name).await
    }

    async fn create_resource_group(
        &self,
        name: &str,
        location: &str,
        tags: &HashMap<String, String>,
    ) -> AzureResult<ResourceGroup> {
        let request = CreateResourceGroupRequest {
            location: location.to_string(),
            tags: tags.clone(),
        };
        resource_groups::create_resource_group(&self.client, name, &request).await
    }

    async fn delete_resource_group(&self, name: &str) -> AzureResult<bool> {
        resource_groups::delete_resource_group(&self.client, name).await?;
        Ok(true)
    }

    async fn check_resource_group_exists(&self, name: &str) -> AzureResult<bool> {
        resource_groups::check_resource_group_exists(&self.client, name).await
    }
}
