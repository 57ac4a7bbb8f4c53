//! # azrm-storage
//!
//! Storage accounts on the management plane and the Blob service data plane.
//!
//! - **Storage Accounts** – create with SKU / replication checks, update, keys, name availability
//! - **Directories** – blob containers
//! - **Files** – blobs: upload, download, metadata, URLs
//! - **Upload** – parallel block upload for large files, committed in file order

pub mod types;
pub mod signing;
pub mod storage_accounts;
pub mod blob_client;
pub mod upload;
pub mod service;
pub mod models;

pub use blob_client::BlobClient;
pub use models::directory::{Directories, Directory, DirectoryAttributes};
pub use models::file::{File, FileAttributes, Files};
pub use models::storage_account::{StorageAccount, StorageAccountAttributes, StorageAccounts};
pub use service::{ArmStorageService, StorageService};
pub use types::StorageCredentials;
pub use upload::UploadConfig;
