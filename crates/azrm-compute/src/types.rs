//! Wire types for `Microsoft.Compute` and the parameter structs handed to
//! the compute service.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use azrm_core::SubResource;

// ─── Virtual Machines ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    pub properties: VmProperties,
    /// Extensions installed on the VM.
    #[serde(default)]
    pub resources: Vec<VirtualMachineExtension>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmProperties {
    #[serde(default)]
    pub vm_id: Option<String>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
    pub hardware_profile: HardwareProfile,
    #[serde(default)]
    pub storage_profile: Option<StorageProfile>,
    pub os_profile: OsProfile,
    pub network_profile: NetworkProfile,
    #[serde(default)]
    pub availability_set: Option<SubResource>,
    #[serde(default)]
    pub instance_view: Option<VmInstanceView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    #[serde(default)]
    pub vm_size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    #[serde(default)]
    pub image_reference: Option<ImageReference>,
    pub os_disk: OsDisk,
    #[serde(default)]
    pub data_disks: Option<Vec<DataDisk>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub offer: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    #[serde(default)]
    pub os_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vhd: Option<VirtualHardDisk>,
    #[serde(default)]
    pub image: Option<VirtualHardDisk>,
    #[serde(default)]
    pub caching: Option<String>,
    #[serde(default)]
    pub create_option: Option<String>,
    #[serde(default, rename = "diskSizeGB")]
    pub disk_size_gb: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VirtualHardDisk {
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataDisk {
    pub lun: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vhd: Option<VirtualHardDisk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caching: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_option: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    #[serde(default)]
    pub computer_name: Option<String>,
    #[serde(default)]
    pub admin_username: Option<String>,
    #[serde(default)]
    pub custom_data: Option<String>,
    #[serde(default)]
    pub linux_configuration: Option<LinuxConfiguration>,
    #[serde(default)]
    pub windows_configuration: Option<WindowsConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinuxConfiguration {
    #[serde(default)]
    pub disable_password_authentication: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowsConfiguration {
    #[serde(default, rename = "provisionVMAgent")]
    pub provision_vm_agent: Option<bool>,
    #[serde(default)]
    pub enable_automatic_updates: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default)]
    pub network_interfaces: Vec<SubResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmInstanceView {
    #[serde(default)]
    pub statuses: Vec<InstanceViewStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceViewStatus {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub display_status: Option<String>,
}

impl VmInstanceView {
    /// `PowerState/running` → `running`.
    pub fn power_state(&self) -> Option<&str> {
        self.statuses
            .iter()
            .rev()
            .find_map(|s| s.code.strip_prefix("PowerState/"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmSize {
    pub name: String,
    #[serde(default)]
    pub number_of_cores: u32,
    #[serde(default)]
    pub memory_in_mb: u64,
    #[serde(default)]
    pub max_data_disk_count: u32,
    #[serde(default)]
    pub os_disk_size_in_mb: u64,
    #[serde(default)]
    pub resource_disk_size_in_mb: u64,
}

// ─── Availability Sets ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySet {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub sku: Option<Sku>,
    #[serde(default)]
    pub properties: Option<AvailabilitySetProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Sku {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySetProperties {
    #[serde(default)]
    pub platform_update_domain_count: Option<u32>,
    #[serde(default)]
    pub platform_fault_domain_count: Option<u32>,
    #[serde(default)]
    pub virtual_machines: Vec<SubResource>,
}

// ─── VM Extensions ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineExtension {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub properties: Option<VmExtensionProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmExtensionProperties {
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default, rename = "type")]
    pub extension_type: Option<String>,
    #[serde(default)]
    pub type_handler_version: Option<String>,
    #[serde(default)]
    pub auto_upgrade_minor_version: Option<bool>,
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

// ─── Parameters ─────────────────────────────────────────────────────

/// Everything `create_virtual_machine` needs, one field per server attribute.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VirtualMachineParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub vm_size: String,
    pub storage_account_name: String,
    pub username: String,
    pub password: Option<String>,
    pub disable_password_authentication: Option<bool>,
    pub ssh_key_path: Option<String>,
    pub ssh_key_data: Option<String>,
    pub network_interface_card_ids: Vec<String>,
    pub availability_set_id: Option<String>,
    pub publisher: Option<String>,
    pub offer: Option<String>,
    pub sku: Option<String>,
    pub version: Option<String>,
    pub platform: Option<String>,
    pub provision_vm_agent: Option<bool>,
    pub enable_automatic_updates: Option<bool>,
    pub custom_data: Option<String>,
    pub vhd_path: Option<String>,
    pub os_disk_caching: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DataDiskParams {
    pub disk_name: String,
    pub disk_size_gb: u32,
    pub storage_account_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AvailabilitySetParams {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub platform_update_domain_count: u32,
    pub platform_fault_domain_count: u32,
    pub use_managed_disk: bool,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VmExtensionParams {
    pub resource_group: String,
    pub vm_name: String,
    pub name: String,
    pub location: String,
    pub publisher: String,
    pub extension_type: String,
    pub type_handler_version: String,
    pub auto_upgrade_minor_version: Option<bool>,
    pub settings: Option<serde_json::Value>,
    pub protected_settings: Option<serde_json::Value>,
}
