use serde::{Deserialize, Serialize};

use azrm_core::ids::storage_account_from_uri;

use crate::types::DataDisk;

/// Data disk attached to a server; parsed out of the server payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataDiskAttributes {
    pub name: Option<String>,
    pub disk_size_gb: Option<u32>,
    pub lun: Option<u32>,
    pub vhd_uri: Option<String>,
    pub caching: Option<String>,
    pub create_option: Option<String>,
    pub storage_account_name: Option<String>,
}

impl DataDiskAttributes {
    pub fn parse(disk: &DataDisk) -> Self {
        let vhd_uri = disk.vhd.as_ref().map(|v| v.uri.clone());
        Self {
            name: disk.name.clone(),
            disk_size_gb: disk.disk_size_gb,
            lun: Some(disk.lun),
            storage_account_name: vhd_uri.as_deref().and_then(storage_account_from_uri),
            vhd_uri,
            caching: disk.caching.clone(),
            create_option: disk.create_option.clone(),
        }
    }
}
