use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::StorageService;
use crate::types::Blob;
use crate::upload::{self, UploadConfig};

const KIND: &str = "File";

/// A blob inside a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileAttributes {
    /// Blob name.
    pub key: Option<String>,
    /// Container name.
    pub directory: Option<String>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub content_md5: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub blob_type: Option<String>,
    pub lease_status: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

impl Attributes for FileAttributes {
    /// A blob payload never names its container.
    fn apply(&self, parsed: Self) -> Self {
        Self {
            directory: parsed.directory.or_else(|| self.directory.clone()),
            ..parsed
        }
    }
}

pub struct File {
    service: Arc<dyn StorageService>,
    upload: UploadConfig,
    pub attributes: FileAttributes,
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl File {
    pub fn new(service: Arc<dyn StorageService>, attributes: FileAttributes) -> Self {
        Self {
            service,
            upload: UploadConfig::default(),
            attributes,
        }
    }

    pub fn with_upload_config(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    pub fn parse(blob: &Blob) -> FileAttributes {
        let p = &blob.properties;
        FileAttributes {
            key: Some(blob.name.clone()),
            directory: None,
            content_length: p.content_length,
            content_type: p.content_type.clone(),
            content_encoding: p.content_encoding.clone(),
            content_md5: p.content_md5.clone(),
            etag: p.etag.clone(),
            last_modified: p.last_modified.clone(),
            blob_type: p.blob_type.clone(),
            lease_status: p.lease_status.clone(),
            metadata: Some(blob.metadata.clone()),
        }
    }

    /// (directory, key)
    fn location(&self) -> AzureResult<(&str, &str)> {
        Requires::new(KIND)
            .field("key", &self.attributes.key)
            .field("directory", &self.attributes.directory)
            .check()?;
        Ok((
            require(KIND, "directory", &self.attributes.directory)?,
            require(KIND, "key", &self.attributes.key)?,
        ))
    }

    /// Upload a local file, in parallel blocks when it is large.
    pub async fn save_from_file(&mut self, path: impl AsRef<Path>) -> AzureResult<&Self> {
        let (directory, key) = self.location()?;
        let blob = upload::upload_block_blob_from_file(
            self.service.clone(),
            directory,
            key,
            Some(path.as_ref()),
            &self.upload,
        )
        .await?;
        self.attributes = self.attributes.apply(Self::parse(&blob));
        Ok(self)
    }

    pub async fn save_bytes(&mut self, body: Vec<u8>) -> AzureResult<&Self> {
        let (directory, key) = self.location()?;
        let blob = self.service.create_block_blob(directory, key, body).await?;
        self.attributes = self.attributes.apply(Self::parse(&blob));
        Ok(self)
    }

    /// Download the blob's content.
    pub async fn body(&self) -> AzureResult<Vec<u8>> {
        let (directory, key) = self.location()?;
        self.service.get_blob(directory, key).await
    }

    /// Replace the blob's metadata.
    pub async fn set_metadata(&mut self, metadata: HashMap<String, String>) -> AzureResult<&Self> {
        let (directory, key) = self.location()?;
        self.service.put_blob_metadata(directory, key, &metadata).await?;
        self.attributes.metadata = Some(metadata);
        Ok(self)
    }

    pub fn get_url(&self) -> AzureResult<String> {
        let (directory, key) = self.location()?;
        self.service.get_blob_url(directory, key)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let (directory, key) = self.location()?;
        self.service.delete_blob(directory, key).await
    }
}

pub struct Files {
    service: Arc<dyn StorageService>,
    pub directory: Option<String>,
    loaded: Vec<File>,
}

impl Files {
    pub fn new(service: Arc<dyn StorageService>) -> Self {
        Self {
            service,
            directory: None,
            loaded: Vec::new(),
        }
    }

    pub fn in_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub async fn all(&mut self) -> AzureResult<&[File]> {
        let directory = require("Files", "directory", &self.directory)?;
        let blobs = self.service.list_blobs(directory).await?;
        self.loaded = blobs
            .iter()
            .map(|b| {
                let mut attributes = File::parse(b);
                attributes.directory = Some(directory.to_string());
                File::new(self.service.clone(), attributes)
            })
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, directory: &str, name: &str) -> AzureResult<File> {
        let blob = self.service.get_blob_properties(directory, name).await?;
        let mut attributes = File::parse(&blob);
        attributes.directory = Some(directory.to_string());
        Ok(File::new(self.service.clone(), attributes))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&File> {
        self.loaded
            .iter()
            .find(|f| f.attributes.key.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[File] {
        &self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockStorageService;
    use crate::types::BlobProperties;
    use azrm_core::AzureErrorKind;
    use std::io::Write;

    fn blob(name: &str, len: u64) -> Blob {
        Blob {
            name: name.into(),
            properties: BlobProperties {
                content_length: Some(len),
                etag: Some("0x8D3B6B3D353FFCA".into()),
                content_md5: Some("tXAohIyxuu/t94Lp/ujeRw==".into()),
                blob_type: Some("BlockBlob".into()),
                ..Default::default()
            },
            metadata: HashMap::new(),
        }
    }

    fn file_attrs() -> FileAttributes {
        FileAttributes {
            key: Some("notes.txt".into()),
            directory: Some("docs".into()),
            ..Default::default()
        }
    }

    #[test]
    fn apply_keeps_directory() {
        let current = file_attrs();
        let merged = current.apply(File::parse(&blob("notes.txt", 5)));
        assert_eq!(merged.directory.as_deref(), Some("docs"));
        assert_eq!(merged.content_length, Some(5));
    }

    #[tokio::test]
    async fn save_requires_key_and_directory() {
        let mut mock = MockStorageService::new();
        mock.expect_create_block_blob().times(0);
        let mut file = File::new(Arc::new(mock), FileAttributes::default());
        let err = file.save_bytes(b"hi".to_vec()).await.unwrap_err();
        assert_eq!(err.kind, AzureErrorKind::MissingAttribute);
        assert!(err.message.ends_with("key, directory"));
    }

    #[tokio::test]
    async fn save_bytes_applies_properties() {
        let mut mock = MockStorageService::new();
        mock.expect_create_block_blob()
            .withf(|d: &str, k: &str, body: &Vec<u8>| d == "docs" && k == "notes.txt" && body == b"hello")
            .times(1)
            .returning(|_, k, body| Ok(blob(k, body.len() as u64)));
        let mut file = File::new(Arc::new(mock), file_attrs());
        file.save_bytes(b"hello".to_vec()).await.unwrap();
        assert_eq!(file.attributes.content_length, Some(5));
        assert_eq!(file.attributes.directory.as_deref(), Some("docs"));
        assert_eq!(file.attributes.blob_type.as_deref(), Some("BlockBlob"));
    }

    #[tokio::test]
    async fn save_from_small_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"from disk").unwrap();
        tmp.flush().unwrap();

        let mut mock = MockStorageService::new();
        mock.expect_create_block_blob()
            .withf(|_: &str, _: &str, body: &Vec<u8>| body == b"from disk")
            .times(1)
            .returning(|_, k, body| Ok(blob(k, body.len() as u64)));
        let mut file = File::new(Arc::new(mock), file_attrs());
        file.save_from_file(tmp.path()).await.unwrap();
        assert_eq!(file.attributes.content_length, Some(9));
    }

    #[tokio::test]
    async fn body_metadata_url_destroy() {
        let mut mock = MockStorageService::new();
        mock.expect_get_blob().returning(|_, _| Ok(b"hello".to_vec()));
        mock.expect_put_blob_metadata()
            .withf(|_: &str, _: &str, m: &HashMap<String, String>| m.get("owner").map(String::as_str) == Some("fog"))
            .times(1)
            .returning(|_, _, _| Ok(()));
        mock.expect_get_blob_url()
            .returning(|d, k| Ok(format!("https://acct.blob.core.windows.net/{d}/{k}")));
        mock.expect_delete_blob().times(1).returning(|_, _| Ok(true));
        let mut file = File::new(Arc::new(mock), file_attrs());

        assert_eq!(file.body().await.unwrap(), b"hello");
        file.set_metadata(HashMap::from([("owner".to_string(), "fog".to_string())]))
            .await
            .unwrap();
        assert_eq!(file.attributes.metadata.as_ref().unwrap()["owner"], "fog");
        assert_eq!(
            file.get_url().unwrap(),
            "https://acct.blob.core.windows.net/docs/notes.txt"
        );
        assert!(file.destroy().await.unwrap());
    }

    #[tokio::test]
    async fn collection_assigns_directory() {
        let mut mock = MockStorageService::new();
        mock.expect_list_blobs()
            .withf(|d: &str| d == "docs")
            .returning(|_| Ok(vec![blob("a.txt", 1), blob("b.txt", 2)]));
        mock.expect_get_blob_properties()
            .returning(|_, k| Ok(blob(k, 3)));
        let mut files = Files::new(Arc::new(mock)).in_directory("docs");

        let all = files.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|f| f.attributes.directory.as_deref() == Some("docs")));
        assert_eq!(files.find_loaded("b.txt").unwrap().attributes.content_length, Some(2));

        let fetched = files.get("docs", "c.txt").await.unwrap();
        assert_eq!(fetched.attributes.directory.as_deref(), Some("docs"));
        assert_eq!(fetched.attributes.content_length, Some(3));
    }

    #[tokio::test]
    async fn all_requires_directory() {
        let mut mock = MockStorageService::new();
        mock.expect_list_blobs().times(0);
        let mut files = Files::new(Arc::new(mock));
        assert_eq!(files.all().await.unwrap_err().kind, AzureErrorKind::MissingAttribute);
    }
}
