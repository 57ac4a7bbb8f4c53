use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureError, AzureErrorKind, AzureResult, Requires};

use crate::service::StorageService;
use crate::types::{self, StorageAccountKey, StorageAccountParams, StorageAccountUpdateParams};

const KIND: &str = "StorageAccount";

pub const STANDARD: &str = "Standard";
pub const PREMIUM: &str = "Premium";
pub const LRS: &str = "LRS";
pub const ALLOWED_STANDARD_REPLICATION: [&str; 4] = ["LRS", "ZRS", "GRS", "RAGRS"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageAccountAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    /// `Standard` or `Premium`.
    pub sku_name: Option<String>,
    /// `LRS`, `ZRS`, `GRS` or `RAGRS`.
    pub replication: Option<String>,
    /// Blob service encryption.
    pub encryption: Option<bool>,
    pub tags: Option<HashMap<String, String>>,
}

impl Attributes for StorageAccountAttributes {
    fn apply(&self, parsed: Self) -> Self {
        Self {
            encryption: parsed.encryption.or(self.encryption),
            ..parsed
        }
    }
}

/// `Standard_LRS` → (`Standard`, `LRS`).
pub fn split_sku(sku: &str) -> (String, Option<String>) {
    match sku.split_once('_') {
        Some((tier, replication)) => (tier.to_string(), Some(replication.to_string())),
        None => (sku.to_string(), None),
    }
}

/// Resolve defaults and check the tier / replication pair; returns the full SKU name.
pub fn validate_sku(sku_name: Option<&str>, replication: Option<&str>) -> AzureResult<String> {
    let sku = sku_name.unwrap_or(STANDARD);
    let replication = replication.unwrap_or(LRS);
    let valid = match sku {
        PREMIUM => replication == LRS,
        STANDARD => ALLOWED_STANDARD_REPLICATION.contains(&replication),
        _ => false,
    };
    if !valid {
        return Err(AzureError::new(
            AzureErrorKind::Validation,
            format!("{} replication is not supported for the {} SKU", replication, sku),
        ));
    }
    Ok(format!("{}_{}", sku, replication))
}

pub struct StorageAccount {
    service: Arc<dyn StorageService>,
    pub attributes: StorageAccountAttributes,
}

impl fmt::Debug for StorageAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageAccount")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl StorageAccount {
    pub fn new(service: Arc<dyn StorageService>, attributes: StorageAccountAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(account: &types::StorageAccount) -> StorageAccountAttributes {
        let (sku_name, replication) = split_sku(&account.sku.name);
        StorageAccountAttributes {
            id: Some(account.id.clone()),
            name: Some(account.name.clone()),
            location: Some(account.location.clone()),
            resource_group: resource_group_from_id(&account.id),
            sku_name: Some(sku_name),
            replication,
            encryption: account
                .properties
                .encryption
                .as_ref()
                .and_then(|e| e.blob_enabled()),
            tags: account.tags.clone(),
        }
    }

    fn identity(&self) -> AzureResult<(&str, &str)> {
        Ok((
            require(KIND, "resource_group", &self.attributes.resource_group)?,
            require(KIND, "name", &self.attributes.name)?,
        ))
    }

    fn account_params(&self) -> AzureResult<StorageAccountParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .check()?;
        let sku_name = validate_sku(a.sku_name.as_deref(), a.replication.as_deref())?;
        Ok(StorageAccountParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            sku_name,
            encryption: a.encryption,
            tags: a.tags.clone().unwrap_or_default(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.account_params()?;
        let account = self.service.create_storage_account(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&account));
        Ok(self)
    }

    /// Change SKU tier, replication or encryption; unset arguments keep the current value.
    pub async fn update(
        &mut self,
        sku_name: Option<&str>,
        replication: Option<&str>,
        encryption: Option<bool>,
    ) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let sku_name = validate_sku(
            sku_name.or(self.attributes.sku_name.as_deref()),
            replication.or(self.attributes.replication.as_deref()),
        )?;
        let params = StorageAccountUpdateParams {
            resource_group: rg.to_string(),
            name: name.to_string(),
            sku_name,
            encryption: encryption.or(self.attributes.encryption),
        };
        debug!("updating storage account {}/{} to {}", params.resource_group, params.name, params.sku_name);
        let account = self.service.update_storage_account(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&account));
        Ok(self)
    }

    pub async fn get_access_keys(&self) -> AzureResult<Vec<StorageAccountKey>> {
        let (rg, name) = self.identity()?;
        self.service.get_storage_access_keys(rg, name).await
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.delete_storage_account(rg, name).await
    }
}

pub struct StorageAccounts {
    service: Arc<dyn StorageService>,
    /// Every account in the subscription when unset.
    pub resource_group: Option<String>,
    loaded: Vec<StorageAccount>,
}

impl StorageAccounts {
    pub fn new(service: Arc<dyn StorageService>) -> Self {
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

    pub async fn all(&mut self) -> AzureResult<&[StorageAccount]> {
        let accounts = match &self.resource_group {
            Some(rg) => self.service.list_storage_accounts_in_resource_group(rg).await?,
            None => self.service.list_storage_accounts().await?,
        };
        self.loaded = accounts
            .iter()
            .map(|a| StorageAccount::new(self.service.clone(), StorageAccount::parse(a)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<StorageAccount> {
        let account = self.service.get_storage_account(resource_group, name).await?;
        Ok(StorageAccount::new(self.service.clone(), StorageAccount::parse(&account)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&StorageAccount> {
        self.loaded
            .iter()
            .find(|a| a.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[StorageAccount] {
        &self.loaded
    }

    pub async fn create(&self, attributes: StorageAccountAttributes) -> AzureResult<StorageAccount> {
        let mut account = StorageAccount::new(self.service.clone(), attributes);
        account.save().await?;
        Ok(account)
    }

    /// `true` when `name` can still be taken.
    pub async fn check_name_availability(&self, name: &str) -> AzureResult<bool> {
        let availability = self.service.check_storage_account_name_availability(name).await?;
        if !availability.name_available {
            debug!(
                "storage account name {} unavailable: {}",
                name,
                availability.reason.as_deref().unwrap_or("unknown reason")
            );
        }
        Ok(availability.name_available)
    }

    pub async fn check_storage_account_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_storage_account_exists(resource_group, name).await
    }
}
