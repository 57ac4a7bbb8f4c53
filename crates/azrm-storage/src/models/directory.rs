use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::{require, Attributes, AzureResult};

use crate::models::file::Files;
use crate::service::StorageService;
use crate::types::{BlobContainer, ContainerParams};

const KIND: &str = "Directory";

/// A blob container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryAttributes {
    /// Container name.
    pub key: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// `container`, `blob`, or unset for private.
    pub public_access: Option<String>,
    pub lease_status: Option<String>,
    pub lease_state: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

impl Attributes for DirectoryAttributes {
    fn apply(&self, parsed: Self) -> Self {
        parsed
    }
}

pub struct Directory {
    service: Arc<dyn StorageService>,
    pub attributes: DirectoryAttributes,
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl Directory {
    pub fn new(service: Arc<dyn StorageService>, attributes: DirectoryAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(container: &BlobContainer) -> DirectoryAttributes {
        let p = &container.properties;
        DirectoryAttributes {
            key: Some(container.name.clone()),
            etag: p.etag.clone(),
            last_modified: p.last_modified.clone(),
            public_access: p.public_access.clone(),
            lease_status: p.lease_status.clone(),
            lease_state: p.lease_state.clone(),
            metadata: Some(container.metadata.clone()),
        }
    }

    fn key(&self) -> AzureResult<&str> {
        require(KIND, "key", &self.attributes.key)
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = ContainerParams {
            name: self.key()?.to_string(),
            public_access: self.attributes.public_access.clone(),
            metadata: self.attributes.metadata.clone().unwrap_or_default(),
        };
        let container = self.service.create_container(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&container));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        self.service.delete_container(self.key()?).await
    }

    /// Blobs of this container.
    pub fn files(&self) -> AzureResult<Files> {
        Ok(Files::new(self.service.clone()).in_directory(self.key()?))
    }

    pub fn get_url(&self) -> AzureResult<String> {
        self.service.get_container_url(self.key()?)
    }
}

pub struct Directories {
    service: Arc<dyn StorageService>,
    loaded: Vec<Directory>,
}

impl Directories {
    pub fn new(service: Arc<dyn StorageService>) -> Self {
        Self {
            service,
            loaded: Vec::new(),
        }
    }

    pub async fn all(&mut self) -> AzureResult<&[Directory]> {
        let containers = self.service.list_containers().await?;
        self.loaded = containers
            .iter()
            .map(|c| Directory::new(self.service.clone(), Directory::parse(c)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, name: &str) -> AzureResult<Directory> {
        let container = self.service.get_container_properties(name).await?;
        Ok(Directory::new(self.service.clone(), Directory::parse(&container)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&Directory> {
        self.loaded
            .iter()
            .find(|d| d.attributes.key.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[Directory] {
        &self.loaded
    }

    pub async fn create(&self, attributes: DirectoryAttributes) -> AzureResult<Directory> {
        let mut directory = Directory::new(self.service.clone(), attributes);
        directory.save().await?;
        Ok(directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockStorageService;
    use crate::types::ContainerProperties;
    use azrm_core::AzureErrorKind;

    fn container(name: &str) -> BlobContainer {
        BlobContainer {
            name: name.into(),
            properties: ContainerProperties {
                etag: Some("\"0x8D3\"".into()),
                last_modified: Some("Mon, 01 Jan 2024 00:00:00 GMT".into()),
                lease_status: Some("unlocked".into()),
                lease_state: Some("available".into()),
                public_access: Some("blob".into()),
            },
            metadata: HashMap::from([("owner".to_string(), "fog".to_string())]),
        }
    }

    #[tokio::test]
    async fn save_requires_key() {
        let mut mock = MockStorageService::new();
        mock.expect_create_container().times(0);
        let mut dir = Directory::new(Arc::new(mock), DirectoryAttributes::default());
        let err = dir.save().await.unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::MissingAttribute);
    }

    #[tokio::test]
    async fn save_creates_container() {
        let mut mock = MockStorageService::new();
        mock.expect_create_container()
            .withf(|p: &ContainerParams| p.name == "photos" && p.public_access.as_deref() == Some("blob"))
            .times(1)
            .returning(|p| Ok(container(&p.name)));
        let mut dir = Directory::new(
            Arc::new(mock),
            DirectoryAttributes {
                key: Some("photos".into()),
                public_access: Some("blob".into()),
                ..Default::default()
            },
        );
        dir.save().await.unwrap();
        assert_eq!(dir.attributes.lease_state.as_deref(), Some("available"));
        assert_eq!(dir.attributes.etag.as_deref(), Some("\"0x8D3\""));
    }

    #[tokio::test]
    async fn all_get_url_and_files() {
        let mut mock = MockStorageService::new();
        mock.expect_list_containers()
            .returning(|| Ok(vec![container("photos"), container("logs")]));
        mock.expect_get_container_properties()
            .withf(|n: &str| n == "logs")
            .returning(|n| Ok(container(n)));
        mock.expect_get_container_url()
            .returning(|n| Ok(format!("https://acct.blob.core.windows.net/{n}")));
        mock.expect_delete_container().times(1).returning(|_| Ok(true));
        let mut dirs = Directories::new(Arc::new(mock));

        assert_eq!(dirs.all().await.unwrap().len(), 2);
        let photos = dirs.find_loaded("photos").unwrap();
        assert_eq!(photos.get_url().unwrap(), "https://acct.blob.core.windows.net/photos");
        assert_eq!(photos.files().unwrap().directory.as_deref(), Some("photos"));

        let logs = dirs.get("logs").await.unwrap();
        assert_eq!(logs.attributes.metadata.as_ref().unwrap()["owner"], "fog");
        assert!(logs.destroy().await.unwrap());
    }
}
