//! Virtual machine model and the per-resource-group collection of them.

use std::fmt;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use azrm_core::ids::{resource_group_from_id, storage_account_from_uri};
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::models::async_response::AsyncResponse;
use crate::models::data_disk::DataDiskAttributes;
use crate::service::ComputeService;
use crate::types::{DataDiskParams, VirtualMachine, VirtualMachineParams, VmSize};
use crate::virtual_machines::is_linux;

const KIND: &str = "Server";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub vm_size: Option<String>,
    pub storage_account_name: Option<String>,
    pub os_disk_name: Option<String>,
    pub os_disk_vhd_uri: Option<String>,
    pub os_disk_caching: Option<String>,
    pub publisher: Option<String>,
    pub offer: Option<String>,
    pub sku: Option<String>,
    pub version: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub data_disks: Option<Vec<DataDiskAttributes>>,
    pub disable_password_authentication: Option<bool>,
    pub ssh_key_path: Option<String>,
    pub ssh_key_data: Option<String>,
    pub platform: Option<String>,
    pub provision_vm_agent: Option<bool>,
    pub enable_automatic_updates: Option<bool>,
    pub network_interface_card_ids: Option<Vec<String>>,
    pub availability_set_id: Option<String>,
    pub custom_data: Option<String>,
    pub vhd_path: Option<String>,
}

impl Attributes for ServerAttributes {
    fn apply(&self, parsed: Self) -> Self {
        Self {
            vm_size: parsed.vm_size.or_else(|| self.vm_size.clone()),
            storage_account_name: parsed
                .storage_account_name
                .or_else(|| self.storage_account_name.clone()),
            os_disk_name: parsed.os_disk_name.or_else(|| self.os_disk_name.clone()),
            os_disk_vhd_uri: parsed.os_disk_vhd_uri.or_else(|| self.os_disk_vhd_uri.clone()),
            os_disk_caching: parsed.os_disk_caching.or_else(|| self.os_disk_caching.clone()),
            publisher: parsed.publisher.or_else(|| self.publisher.clone()),
            offer: parsed.offer.or_else(|| self.offer.clone()),
            sku: parsed.sku.or_else(|| self.sku.clone()),
            version: parsed.version.or_else(|| self.version.clone()),
            provision_vm_agent: parsed.provision_vm_agent.or(self.provision_vm_agent),
            enable_automatic_updates: parsed
                .enable_automatic_updates
                .or(self.enable_automatic_updates),
            availability_set_id: parsed
                .availability_set_id
                .or_else(|| self.availability_set_id.clone()),
            password: self.password.clone(),
            ssh_key_path: self.ssh_key_path.clone(),
            ssh_key_data: self.ssh_key_data.clone(),
            platform: self.platform.clone(),
            vhd_path: self.vhd_path.clone(),
            ..parsed
        }
    }
}

pub struct Server {
    service: Arc<dyn ComputeService>,
    pub attributes: ServerAttributes,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl Server {
    pub fn new(service: Arc<dyn ComputeService>, attributes: ServerAttributes) -> Self {
        Self { service, attributes }
    }

    pub(crate) fn service(&self) -> &Arc<dyn ComputeService> {
        &self.service
    }

    pub fn parse(vm: &VirtualMachine) -> ServerAttributes {
        let props = &vm.properties;
        let mut a = ServerAttributes {
            id: Some(vm.id.clone()),
            name: Some(vm.name.clone()),
            location: Some(vm.location.clone()),
            resource_group: resource_group_from_id(&vm.id),
            vm_size: props.hardware_profile.vm_size.clone(),
            username: props.os_profile.admin_username.clone(),
            custom_data: props.os_profile.custom_data.clone(),
            data_disks: Some(Vec::new()),
            disable_password_authentication: Some(false),
            network_interface_card_ids: Some(
                props
                    .network_profile
                    .network_interfaces
                    .iter()
                    .map(|nic| nic.id.clone())
                    .collect(),
            ),
            availability_set_id: props.availability_set.as_ref().map(|s| s.id.clone()),
            ..Default::default()
        };

        if let Some(storage) = &props.storage_profile {
            let os_disk = &storage.os_disk;
            a.os_disk_name = os_disk.name.clone();
            a.os_disk_vhd_uri = os_disk.vhd.as_ref().map(|v| v.uri.clone());
            a.storage_account_name = a.os_disk_vhd_uri.as_deref().and_then(storage_account_from_uri);
            a.os_disk_caching = os_disk.caching.clone();
            if let Some(image) = &storage.image_reference {
                a.publisher = image.publisher.clone();
                a.offer = image.offer.clone();
                a.sku = image.sku.clone();
                a.version = image.version.clone();
            }
            if let Some(disks) = &storage.data_disks {
                a.data_disks = Some(disks.iter().map(DataDiskAttributes::parse).collect());
            }
        }

        if let Some(linux) = &props.os_profile.linux_configuration {
            a.disable_password_authentication = linux.disable_password_authentication;
        }
        if let Some(windows) = &props.os_profile.windows_configuration {
            a.provision_vm_agent = windows.provision_vm_agent;
            a.enable_automatic_updates = windows.enable_automatic_updates;
        }
        a
    }

    fn check_required(&self) -> AzureResult<()> {
        let a = &self.attributes;
        let linux = is_linux(a.platform.as_deref());
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .field("vm_size", &a.vm_size)
            .field("storage_account_name", &a.storage_account_name)
            .field("username", &a.username)
            .field("network_interface_card_ids", &a.network_interface_card_ids)
            .field_if(a.vhd_path.is_none(), "publisher", &a.publisher)
            .field_if(a.vhd_path.is_none(), "offer", &a.offer)
            .field_if(a.vhd_path.is_none(), "sku", &a.sku)
            .field_if(a.vhd_path.is_none(), "version", &a.version)
            .field_if(linux, "disable_password_authentication", &a.disable_password_authentication)
            .field_if(!linux, "password", &a.password)
            .check()
    }

    /// One field per attribute; `ssh_key_path` is derived from `username`
    /// whenever key data is supplied.
    pub fn virtual_machine_params(&self) -> AzureResult<VirtualMachineParams> {
        self.check_required()?;
        let a = &self.attributes;
        let username = require(KIND, "username", &a.username)?.to_string();
        let ssh_key_path = a
            .ssh_key_data
            .as_ref()
            .map(|_| format!("/home/{}/.ssh/authorized_keys", username));
        Ok(VirtualMachineParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            vm_size: require(KIND, "vm_size", &a.vm_size)?.to_string(),
            storage_account_name: require(KIND, "storage_account_name", &a.storage_account_name)?
                .to_string(),
            username,
            password: a.password.clone(),
            disable_password_authentication: a.disable_password_authentication,
            ssh_key_path,
            ssh_key_data: a.ssh_key_data.clone(),
            network_interface_card_ids: a.network_interface_card_ids.clone().unwrap_or_default(),
            availability_set_id: a.availability_set_id.clone(),
            publisher: a.publisher.clone(),
            offer: a.offer.clone(),
            sku: a.sku.clone(),
            version: a.version.clone(),
            platform: a.platform.clone(),
            provision_vm_agent: a.provision_vm_agent,
            enable_automatic_updates: a.enable_automatic_updates,
            custom_data: a.custom_data.clone(),
            vhd_path: a.vhd_path.clone(),
            os_disk_caching: a.os_disk_caching.clone(),
        })
    }

    /// Create the VM and wait for the provisioned payload.
    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.virtual_machine_params()?;
        let vm = self.service.create_virtual_machine(&params).await?;
        info!("server {}/{} saved", params.resource_group, params.name);
        self.refresh_from(&vm);
        Ok(self)
    }

    /// Start creation and hand back a pollable response instead of waiting.
    pub async fn save_async(self) -> AzureResult<AsyncResponse> {
        let params = self.virtual_machine_params()?;
        let operation = self.service.create_virtual_machine_async(&params).await?;
        Ok(AsyncResponse::new(self, operation))
    }

    pub(crate) fn refresh_from(&mut self, vm: &VirtualMachine) {
        self.attributes = self.attributes.apply(Self::parse(vm));
    }

    fn identity(&self) -> AzureResult<(&str, &str)> {
        Ok((
            require(KIND, "resource_group", &self.attributes.resource_group)?,
            require(KIND, "name", &self.attributes.name)?,
        ))
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.delete_virtual_machine(rg, name).await
    }

    pub async fn generalize(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.generalize_virtual_machine(rg, name).await
    }

    pub async fn power_off(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.power_off_virtual_machine(rg, name).await
    }

    pub async fn start(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.start_virtual_machine(rg, name).await
    }

    pub async fn restart(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.restart_virtual_machine(rg, name).await
    }

    pub async fn deallocate(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.deallocate_virtual_machine(rg, name).await
    }

    pub async fn redeploy(&self) -> AzureResult<bool> {
        let (rg, name) = self.identity()?;
        self.service.redeploy_virtual_machine(rg, name).await
    }

    pub async fn list_available_sizes(&self) -> AzureResult<Vec<VmSize>> {
        let (rg, name) = self.identity()?;
        self.service.list_available_sizes_for_virtual_machine(rg, name).await
    }

    /// Power state such as `running` or `deallocated`.
    pub async fn vm_status(&self) -> AzureResult<String> {
        let (rg, name) = self.identity()?;
        self.service.check_vm_status(rg, name).await
    }

    pub async fn attach_data_disk(
        &mut self,
        disk_name: &str,
        disk_size_gb: u32,
        storage_account_name: &str,
    ) -> AzureResult<&Self> {
        let params = DataDiskParams {
            disk_name: disk_name.to_string(),
            disk_size_gb,
            storage_account_name: storage_account_name.to_string(),
        };
        let (rg, name) = self.identity()?;
        let vm = self.service.attach_data_disk_to_vm(rg, name, &params).await?;
        self.refresh_from(&vm);
        Ok(self)
    }

    pub async fn detach_data_disk(&mut self, disk_name: &str) -> AzureResult<&Self> {
        let (rg, name) = self.identity()?;
        let vm = self.service.detach_data_disk_from_vm(rg, name, disk_name).await?;
        self.refresh_from(&vm);
        Ok(self)
    }
}

/// Virtual machines of one resource group.
pub struct Servers {
    service: Arc<dyn ComputeService>,
    pub resource_group: Option<String>,
    loaded: Vec<Server>,
}

impl Servers {
    pub fn new(service: Arc<dyn ComputeService>) -> Self {
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

    pub async fn all(&mut self) -> AzureResult<&[Server]> {
        Requires::new("Servers")
            .field("resource_group", &self.resource_group)
            .check()?;
        let rg = require("Servers", "resource_group", &self.resource_group)?;
        let vms = self.service.list_virtual_machines(rg).await?;
        self.loaded = vms
            .iter()
            .map(|vm| Server::new(self.service.clone(), Server::parse(vm)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<Server> {
        let vm = self.service.get_virtual_machine(resource_group, name).await?;
        Ok(Server::new(self.service.clone(), Server::parse(&vm)))
    }

    /// Search the sequence loaded by the last `all` without a remote call.
    pub fn find_loaded(&self, name: &str) -> Option<&Server> {
        self.loaded
            .iter()
            .find(|s| s.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[Server] {
        &self.loaded
    }

    pub async fn create(&self, attributes: ServerAttributes) -> AzureResult<Server> {
        let mut server = Server::new(self.service.clone(), attributes);
        server.save().await?;
        Ok(server)
    }

    pub async fn create_async(&self, attributes: ServerAttributes) -> AzureResult<AsyncResponse> {
        Server::new(self.service.clone(), attributes).save_async().await
    }

    pub async fn check_vm_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_vm_exists(resource_group, name).await
    }
}
