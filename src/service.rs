//! Central façade over every resource domain.
//!
//! Owns one authenticated [`AzureClient`] and hands the domain services to
//! the collection types so callers never wire `Arc<dyn …Service>` by hand.

use std::fmt;
use std::sync::Arc;

use log::info;

use azrm_compute::{
    ArmComputeService, AvailabilitySets, ComputeService, Servers, VirtualMachineExtensions,
};
use azrm_core::{AzureClient, AzureConfig, AzureCredentials, AzureResult};
use azrm_dns::{ArmDnsService, DnsService, RecordSets, Zones};
use azrm_network::{
    ArmNetworkService, LoadBalancers, LocalNetworkGateways, NetworkInterfaces,
    NetworkSecurityGroups, NetworkService, PublicIps, Subnets, VirtualNetworks,
};
use azrm_resources::{ArmResourcesService, ResourceGroups, ResourcesService};
use azrm_sql::{ArmSqlService, FirewallRules, SqlDatabases, SqlServers, SqlService};
use azrm_storage::{
    ArmStorageService, Directories, Files, StorageAccounts, StorageCredentials, StorageService,
};

pub struct AzureRm {
    client: Arc<AzureClient>,
    resources: Arc<dyn ResourcesService>,
    compute: Arc<dyn ComputeService>,
    network: Arc<dyn NetworkService>,
    storage: Arc<dyn StorageService>,
    sql: Arc<dyn SqlService>,
    dns: Arc<dyn DnsService>,
}

impl fmt::Debug for AzureRm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureRm")
            .field("subscription_id", &self.client.credentials().subscription_id)
            .finish_non_exhaustive()
    }
}

impl AzureRm {
    pub fn new(credentials: AzureCredentials, config: AzureConfig) -> Self {
        let client = Arc::new(AzureClient::new(credentials, config));
        Self {
            resources: Arc::new(ArmResourcesService::new(client.clone())),
            compute: Arc::new(ArmComputeService::new(client.clone())),
            network: Arc::new(ArmNetworkService::new(client.clone())),
            storage: Arc::new(ArmStorageService::new(client.clone())),
            sql: Arc::new(ArmSqlService::new(client.clone())),
            dns: Arc::new(ArmDnsService::new(client.clone())),
            client,
        }
    }

    /// Service principal from `AZURE_*` variables, default endpoints and API versions.
    pub fn from_environment() -> Self {
        Self::new(AzureCredentials::from_environment(), AzureConfig::new())
    }

    /// Enables blob operations (directories, files, uploads) for one storage account.
    pub fn with_storage_account(mut self, credentials: &StorageCredentials) -> AzureResult<Self> {
        let storage = ArmStorageService::new(self.client.clone()).with_storage_account(credentials)?;
        info!("Blob access enabled for storage account {}", credentials.account_name);
        self.storage = Arc::new(storage);
        Ok(self)
    }

    pub fn client(&self) -> &Arc<AzureClient> {
        &self.client
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn resources(&self) -> Arc<dyn ResourcesService> {
        self.resources.clone()
    }

    pub fn compute(&self) -> Arc<dyn ComputeService> {
        self.compute.clone()
    }

    pub fn network(&self) -> Arc<dyn NetworkService> {
        self.network.clone()
    }

    pub fn storage(&self) -> Arc<dyn StorageService> {
        self.storage.clone()
    }

    pub fn sql(&self) -> Arc<dyn SqlService> {
        self.sql.clone()
    }

    pub fn dns(&self) -> Arc<dyn DnsService> {
        self.dns.clone()
    }

    // ── Resources ────────────────────────────────────────────────────

    pub fn resource_groups(&self) -> ResourceGroups {
        ResourceGroups::new(self.resources())
    }

    // ── Compute ──────────────────────────────────────────────────────

    pub fn servers(&self) -> Servers {
        Servers::new(self.compute())
    }

    pub fn availability_sets(&self) -> AvailabilitySets {
        AvailabilitySets::new(self.compute())
    }

    pub fn virtual_machine_extensions(&self) -> VirtualMachineExtensions {
        VirtualMachineExtensions::new(self.compute())
    }

    // ── Network ──────────────────────────────────────────────────────

    pub fn virtual_networks(&self) -> VirtualNetworks {
        VirtualNetworks::new(self.network())
    }

    pub fn subnets(&self) -> Subnets {
        Subnets::new(self.network())
    }

    pub fn public_ips(&self) -> PublicIps {
        PublicIps::new(self.network())
    }

    pub fn network_interfaces(&self) -> NetworkInterfaces {
        NetworkInterfaces::new(self.network())
    }

    pub fn load_balancers(&self) -> LoadBalancers {
        LoadBalancers::new(self.network())
    }

    pub fn network_security_groups(&self) -> NetworkSecurityGroups {
        NetworkSecurityGroups::new(self.network())
    }

    pub fn local_network_gateways(&self) -> LocalNetworkGateways {
        LocalNetworkGateways::new(self.network())
    }

    // ── Storage ──────────────────────────────────────────────────────

    pub fn storage_accounts(&self) -> StorageAccounts {
        StorageAccounts::new(self.storage())
    }

    pub fn directories(&self) -> Directories {
        Directories::new(self.storage())
    }

    pub fn files(&self) -> Files {
        Files::new(self.storage())
    }

    // ── SQL ──────────────────────────────────────────────────────────

    pub fn sql_servers(&self) -> SqlServers {
        SqlServers::new(self.sql())
    }

    pub fn sql_databases(&self) -> SqlDatabases {
        SqlDatabases::new(self.sql())
    }

    pub fn firewall_rules(&self) -> FirewallRules {
        FirewallRules::new(self.sql())
    }

    // ── DNS ──────────────────────────────────────────────────────────

    pub fn zones(&self) -> Zones {
        Zones::new(self.dns())
    }

    pub fn record_sets(&self) -> RecordSets {
        RecordSets::new(self.dns())
    }
}
