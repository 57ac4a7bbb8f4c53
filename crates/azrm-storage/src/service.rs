//! Remote operations the storage models depend on.
//!
//! Management-plane calls go through the shared ARM client; blob calls need
//! a storage account's Shared Key credentials.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::info;

use azrm_core::{AzureClient, AzureError, AzureErrorKind, AzureResult};

use crate::blob_client::BlobClient;
use crate::storage_accounts;
use crate::types::{
    Blob, BlobContainer, ContainerParams, NameAvailability, StorageAccount, StorageAccountKey,
    StorageAccountParams, StorageAccountUpdateParams, StorageCredentials,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageService: Send + Sync {
    // ── Storage accounts ─────────────────────────────────────────────
    async fn list_storage_accounts(&self) -> AzureResult<Vec<StorageAccount>>;
    async fn list_storage_accounts_in_resource_group(&self, resource_group: &str) -> AzureResult<Vec<StorageAccount>>;
    async fn get_storage_account(&self, resource_group: &str, name: &str) -> AzureResult<StorageAccount>;
    async fn check_storage_account_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn check_storage_account_name_availability(&self, name: &str) -> AzureResult<NameAvailability>;
    async fn create_storage_account(&self, params: &StorageAccountParams) -> AzureResult<StorageAccount>;
    async fn update_storage_account(&self, params: &StorageAccountUpdateParams) -> AzureResult<StorageAccount>;
    async fn get_storage_access_keys(&self, resource_group: &str, name: &str) -> AzureResult<Vec<StorageAccountKey>>;
    async fn delete_storage_account(&self, resource_group: &str, name: &str) -> AzureResult<bool>;

    // ── Containers ───────────────────────────────────────────────────
    async fn list_containers(&self) -> AzureResult<Vec<BlobContainer>>;
    async fn get_container_properties(&self, name: &str) -> AzureResult<BlobContainer>;
    async fn create_container(&self, params: &ContainerParams) -> AzureResult<BlobContainer>;
    async fn delete_container(&self, name: &str) -> AzureResult<bool>;
    fn get_container_url(&self, name: &str) -> AzureResult<String>;

    // ── Blobs ────────────────────────────────────────────────────────
    async fn list_blobs(&self, container: &str) -> AzureResult<Vec<Blob>>;
    async fn get_blob_properties(&self, container: &str, name: &str) -> AzureResult<Blob>;
    async fn get_blob(&self, container: &str, name: &str) -> AzureResult<Vec<u8>>;
    async fn create_block_blob(&self, container: &str, name: &str, body: Vec<u8>) -> AzureResult<Blob>;
    async fn put_blob_block(&self, container: &str, name: &str, block_id: &str, data: Vec<u8>) -> AzureResult<()>;
    async fn commit_blob_blocks(&self, container: &str, name: &str, block_ids: &[String]) -> AzureResult<()>;
    async fn put_blob_metadata(
        &self,
        container: &str,
        name: &str,
        metadata: &HashMap<String, String>,
    ) -> AzureResult<()>;
    async fn delete_blob(&self, container: &str, name: &str) -> AzureResult<bool>;
    fn get_blob_url(&self, container: &str, name: &str) -> AzureResult<String>;
}

/// ARM management plane plus, when configured, one account's blob data plane.
pub struct ArmStorageService {
    client: Arc<AzureClient>,
    blob: Option<BlobClient>,
}

impl ArmStorageService {
    pub fn new(client: Arc<AzureClient>) -> Self {
        Self { client, blob: None }
    }

    /// Enable blob operations against the account named in `credentials`.
    pub fn with_storage_account(mut self, credentials: &StorageCredentials) -> AzureResult<Self> {
        self.blob = Some(BlobClient::new(credentials)?);
        Ok(self)
    }

    fn blob(&self) -> AzureResult<&BlobClient> {
        self.blob.as_ref().ok_or_else(|| {
            AzureError::new(
                AzureErrorKind::Auth,
                "blob operations need storage account credentials",
            )
        })
    }
}

#[async_trait]
impl StorageService for ArmStorageService {
    async fn list_storage_accounts(&self) -> AzureResult<Vec<StorageAccount>> {
        storage_accounts::list_storage_accounts(&self.client).await
    }

    async fn list_storage_accounts_in_resource_group(&self, resource_group: &str) -> AzureResult<Vec<StorageAccount>> {
        storage_accounts::list_storage_accounts_in_rg(&self.client, resource_group).await
    }

    async fn get_storage_account(&self, resource_group: &str, name: &str) -> AzureResult<StorageAccount> {
        storage_accounts::get_storage_account(&self.client, resource_group, name).await
    }

    async fn check_storage_account_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        storage_accounts::check_storage_account_exists(&self.client, resource_group, name).await
    }

    async fn check_storage_account_name_availability(&self, name: &str) -> AzureResult<NameAvailability> {
        storage_accounts::check_name_availability(&self.client, name).await
    }

    async fn create_storage_account(&self, params: &StorageAccountParams) -> AzureResult<StorageAccount> {
        let account = storage_accounts::create_storage_account(&self.client, params).await?;
        info!("storage account {} saved", account.id);
        Ok(account)
    }

    async fn update_storage_account(&self, params: &StorageAccountUpdateParams) -> AzureResult<StorageAccount> {
        let account = storage_accounts::update_storage_account(&self.client, params).await?;
        info!("storage account {} updated", account.id);
        Ok(account)
    }

    async fn get_storage_access_keys(&self, resource_group: &str, name: &str) -> AzureResult<Vec<StorageAccountKey>> {
        storage_accounts::list_keys(&self.client, resource_group, name).await
    }

    async fn delete_storage_account(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        storage_accounts::delete_storage_account(&self.client, resource_group, name).await?;
        info!("storage account {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn list_containers(&self) -> AzureResult<Vec<BlobContainer>> {
        self.blob()?.list_containers().await
    }

    async fn get_container_properties(&self, name: &str) -> AzureResult<BlobContainer> {
        self.blob()?.get_container_properties(name).await
    }

    async fn create_container(&self, params: &ContainerParams) -> AzureResult<BlobContainer> {
        let blob = self.blob()?;
        let container = blob.create_container(params).await?;
        info!("container {}/{} created", blob.account_name(), params.name);
        Ok(container)
    }

    async fn delete_container(&self, name: &str) -> AzureResult<bool> {
        let blob = self.blob()?;
        blob.delete_container(name).await?;
        info!("container {}/{} deleted", blob.account_name(), name);
        Ok(true)
    }

    fn get_container_url(&self, name: &str) -> AzureResult<String> {
        self.blob()?.container_url(name)
    }

    async fn list_blobs(&self, container: &str) -> AzureResult<Vec<Blob>> {
        self.blob()?.list_blobs(container).await
    }

    async fn get_blob_properties(&self, container: &str, name: &str) -> AzureResult<Blob> {
        self.blob()?.get_blob_properties(container, name).await
    }

    async fn get_blob(&self, container: &str, name: &str) -> AzureResult<Vec<u8>> {
        Ok(self.blob()?.get_blob(container, name).await?.to_vec())
    }

    async fn create_block_blob(&self, container: &str, name: &str, body: Vec<u8>) -> AzureResult<Blob> {
        let created = self
            .blob()?
            .create_block_blob(container, name, Bytes::from(body))
            .await?;
        info!("blob {}/{} created", container, name);
        Ok(created)
    }

    async fn put_blob_block(&self, container: &str, name: &str, block_id: &str, data: Vec<u8>) -> AzureResult<()> {
        self.blob()?
            .put_blob_block(container, name, block_id, Bytes::from(data))
            .await
    }

    async fn commit_blob_blocks(&self, container: &str, name: &str, block_ids: &[String]) -> AzureResult<()> {
        self.blob()?.commit_blob_blocks(container, name, block_ids).await?;
        info!("blob {}/{} committed from {} blocks", container, name, block_ids.len());
        Ok(())
    }

    async fn put_blob_metadata(
        &self,
        container: &str,
        name: &str,
        metadata: &HashMap<String, String>,
    ) -> AzureResult<()> {
        self.blob()?.set_blob_metadata(container, name, metadata).await
    }

    async fn delete_blob(&self, container: &str, name: &str) -> AzureResult<bool> {
        self.blob()?.delete_blob(container, name).await?;
        info!("blob {}/{} deleted", container, name);
        Ok(true)
    }

    fn get_blob_url(&self, container: &str, name: &str) -> AzureResult<String> {
        self.blob()?.blob_url(container, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azrm_core::{AzureConfig, AzureCredentials};

    fn arm() -> Arc<AzureClient> {
        Arc::new(AzureClient::new(AzureCredentials::default(), AzureConfig::new()))
    }

    #[tokio::test]
    async fn blob_calls_need_storage_credentials() {
        let service = ArmStorageService::new(arm());
        let err = service.list_containers().await.unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::Auth);
        assert!(service.get_blob_url("c", "b").is_err());
    }

    #[test]
    fn urls_with_storage_account() {
        let service = ArmStorageService::new(arm())
            .with_storage_account(&StorageCredentials::new("acct", "c2VjcmV0"))
            .unwrap();
        assert_eq!(
            service.get_blob_url("c", "b.txt").unwrap(),
            "https://acct.blob.core.windows.net/c/b.txt"
        );
    }
}
