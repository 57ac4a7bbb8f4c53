//! Remote operations the DNS models depend on.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use azrm_core::{AzureClient, AzureResult};

use crate::types::{RecordSet, RecordSetParams, Zone, ZoneParams};
use crate::{record_sets, zones};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsService: Send + Sync {
    async fn list_zones(&self) -> AzureResult<Vec<Zone>>;
    async fn get_zone(&self, resource_group: &str, name: &str) -> AzureResult<Zone>;
    async fn check_zone_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_or_update_zone(&self, params: &ZoneParams) -> AzureResult<Zone>;
    async fn delete_zone(&self, resource_group: &str, name: &str) -> AzureResult<bool>;

    async fn list_record_sets(&self, resource_group: &str, zone_name: &str, record_type: &str) -> AzureResult<Vec<RecordSet>>;
    async fn get_record_set(&self, resource_group: &str, zone_name: &str, name: &str, record_type: &str) -> AzureResult<RecordSet>;
    async fn create_or_update_record_set(&self, params: &RecordSetParams) -> AzureResult<RecordSet>;
    async fn delete_record_set(&self, resource_group: &str, zone_name: &str, name: &str, record_type: &str) -> AzureResult<bool>;
}

pub struct ArmDnsService {
    client: Arc<AzureClient>,
}

impl ArmDnsService {
    pub fn new(client: Arc<AzureClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DnsService for ArmDnsService {
    async fn list_zones(&self) -> AzureResult<Vec<Zone>> {
        zones::list_zones(&self.client).await
    }

    async fn get_zone(&self, resource_group: &str, name: &str) -> AzureResult<Zone> {
        zones::get_zone(&self.client, resource_group, name).await
    }

    async fn check_zone_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        zones::check_zone_exists(&self.client, resource_group, name).await
    }

    async fn create_or_update_zone(&self, params: &ZoneParams) -> AzureResult<Zone> {
        let zone = zones::create_or_update_zone(&self.client, params).await?;
        info!("DNS zone {} saved", zone.id);
        Ok(zone)
    }

    async fn delete_zone(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        zones::delete_zone(&self.client, resource_group, name).await?;
        info!("DNS zone {}/{} deleted", resource_group, name);
        Ok(true)
    }

    async fn list_record_sets(&self, resource_group: &str, zone_name: &str, record_type: &str) -> AzureResult<Vec<RecordSet>> {
        record_sets::list_record_sets(&self.client, resource_group, zone_name, record_type).await
    }

    async fn get_record_set(&self, resource_group: &str, zone_name: &str, name: &str, record_type: &str) -> AzureResult<RecordSet> {
        record_sets::get_record_set(&self.client, resource_group, zone_name, name, record_type).await
    }

    async fn create_or_update_record_set(&self, params: &RecordSetParams) -> AzureResult<RecordSet> {
        let record_set = record_sets::create_or_update_record_set(&self.client, params).await?;
        info!("DNS record set {} saved", record_set.id);
        Ok(record_set)
    }

    async fn delete_record_set(&self, resource_group: &str, zone_name: &str, name: &str, record_type: &str) -> AzureResult<bool> {
        record_sets::delete_record_set(&self.client, resource_group, zone_name, name, record_type).await?;
        info!("DNS record set {}/{}/{}/{} deleted", resource_group, zone_name, record_type, name);
        Ok(true)
    }
}
