//! Wire types for the storage management plane (ARM JSON) and the blob data
//! plane (Blob service XML), plus the parameter structs the models hand to
//! the service.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

// ─── Storage credentials ─────────────────────────────────────────────

/// Shared Key credentials of one storage account (data plane).
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct StorageCredentials {
    pub account_name: String,
    pub access_key: String,
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("account_name", &self.account_name)
            .field("access_key", &"***")
            .finish()
    }
}

impl StorageCredentials {
    pub fn new(account_name: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            access_key: access_key.into(),
        }
    }

    /// Read `AZURE_STORAGE_ACCOUNT_NAME` and `AZURE_STORAGE_ACCESS_KEY`.
    pub fn from_environment() -> Self {
        Self {
            account_name: env::var("AZURE_STORAGE_ACCOUNT_NAME").unwrap_or_default(),
            access_key: env::var("AZURE_STORAGE_ACCESS_KEY").unwrap_or_default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.account_name.is_empty() && !self.access_key.is_empty()
    }

    pub fn blob_endpoint(&self) -> String {
        format!("https://{}.blob.core.windows.net", self.account_name)
    }
}

// ─── Storage accounts (ARM) ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageSku {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub kind: Option<String>,
    pub sku: StorageSku,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: StorageAccountProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub primary_location: Option<String>,
    #[serde(default)]
    pub status_of_primary: Option<String>,
    #[serde(default)]
    pub primary_endpoints: Option<HashMap<String, String>>,
    #[serde(default)]
    pub encryption: Option<StorageEncryption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageEncryption {
    #[serde(default)]
    pub services: Option<EncryptionServices>,
    #[serde(default)]
    pub key_source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EncryptionServices {
    #[serde(default)]
    pub blob: Option<EncryptionService>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EncryptionService {
    #[serde(default)]
    pub enabled: bool,
}

impl StorageEncryption {
    /// `encryption.services.blob.enabled`, when the block is present.
    pub fn blob_enabled(&self) -> Option<bool> {
        self.services
            .as_ref()
            .and_then(|s| s.blob.as_ref())
            .map(|b| b.enabled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountKey {
    pub key_name: String,
    pub value: String,
    #[serde(default)]
    pub permissions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageKeyList {
    #[serde(default)]
    pub keys: Vec<StorageAccountKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NameAvailability {
    pub name_available: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Inputs of a storage account create.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageAccountParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    /// Full SKU name, e.g. `Standard_LRS`.
    pub sku_name: String,
    pub encryption: Option<bool>,
    pub tags: HashMap<String, String>,
}

/// Inputs of a storage account update (PATCH).
#[derive(Debug, Clone, PartialEq)]
pub struct StorageAccountUpdateParams {
    pub resource_group: String,
    pub name: String,
    pub sku_name: String,
    pub encryption: Option<bool>,
}

// ─── Blob service (XML) ──────────────────────────────────────────────

/// One container as listed by `?comp=list` or read from its properties.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BlobContainer {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Properties", default)]
    pub properties: ContainerProperties,
    #[serde(rename = "Metadata", default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ContainerProperties {
    #[serde(rename = "Last-Modified", default)]
    pub last_modified: Option<String>,
    #[serde(rename = "Etag", default)]
    pub etag: Option<String>,
    #[serde(rename = "LeaseStatus", default)]
    pub lease_status: Option<String>,
    #[serde(rename = "LeaseState", default)]
    pub lease_state: Option<String>,
    #[serde(rename = "PublicAccess", default)]
    pub public_access: Option<String>,
}

/// One blob as listed by `?restype=container&comp=list` or read from its headers.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Blob {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Properties", default)]
    pub properties: BlobProperties,
    #[serde(rename = "Metadata", default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BlobProperties {
    #[serde(rename = "Last-Modified", default)]
    pub last_modified: Option<String>,
    #[serde(rename = "Etag", default)]
    pub etag: Option<String>,
    #[serde(rename = "Content-Length", default)]
    pub content_length: Option<u64>,
    #[serde(rename = "Content-Type", default)]
    pub content_type: Option<String>,
    #[serde(rename = "Content-Encoding", default)]
    pub content_encoding: Option<String>,
    #[serde(rename = "Content-MD5", default)]
    pub content_md5: Option<String>,
    #[serde(rename = "BlobType", default)]
    pub blob_type: Option<String>,
    #[serde(rename = "LeaseStatus", default)]
    pub lease_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ContainerEnumeration {
    #[serde(rename = "Containers", default)]
    pub containers: ContainerList,
    #[serde(rename = "NextMarker", default)]
    pub next_marker: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ContainerList {
    #[serde(rename = "Container", default)]
    pub items: Vec<BlobContainer>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct BlobEnumeration {
    #[serde(rename = "Blobs", default)]
    pub blobs: BlobList,
    #[serde(rename = "NextMarker", default)]
    pub next_marker: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct BlobList {
    #[serde(rename = "Blob", default)]
    pub items: Vec<Blob>,
}

/// Inputs of a container create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerParams {
    pub name: String,
    /// `container` or `blob`; private when unset.
    pub public_access: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_account_deserializes() {
        let json = r#"{
            "id": "/subscriptions/s/resourceGroups/fog-rg/providers/Microsoft.Storage/storageAccounts/fogsa",
            "name": "fogsa",
            "location": "westus",
            "kind": "Storage",
            "sku": {"name": "Standard_GRS", "tier": "Standard"},
            "properties": {
                "provisioningState": "Succeeded",
                "encryption": {"services": {"blob": {"enabled": true}}, "keySource": "Microsoft.Storage"}
            }
        }"#;
        let sa: StorageAccount = serde_json::from_str(json).unwrap();
        assert_eq!(sa.sku.name, "Standard_GRS");
        assert_eq!(sa.properties.encryption.unwrap().blob_enabled(), Some(true));
    }

    #[test]
    fn storage_account_requires_sku() {
        let json = r#"{"id": "x", "name": "n", "location": "l"}"#;
        assert!(serde_json::from_str::<StorageAccount>(json).is_err());
    }

    #[test]
    fn credentials_debug_hides_key() {
        let c = StorageCredentials::new("acct", "c2VjcmV0");
        let dbg = format!("{c:?}");
        assert!(dbg.contains("acct"));
        assert!(!dbg.contains("c2VjcmV0"));
        assert_eq!(c.blob_endpoint(), "https://acct.blob.core.windows.net");
        assert!(c.is_configured());
        assert!(!StorageCredentials::default().is_configured());
    }
}
