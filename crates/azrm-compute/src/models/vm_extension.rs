use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use azrm_core::ids::{resource_group_from_id, segment_after};
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::ComputeService;
use crate::types::{self, VmExtensionParams};

const KIND: &str = "VirtualMachineExtension";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualMachineExtensionAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_group: Option<String>,
    pub location: Option<String>,
    pub vm_name: Option<String>,
    pub publisher: Option<String>,
    pub extension_type: Option<String>,
    pub type_handler_version: Option<String>,
    pub auto_upgrade_minor_version: Option<bool>,
    pub settings: Option<Value>,
    pub protected_settings: Option<Value>,
}

impl Attributes for VirtualMachineExtensionAttributes {
    fn apply(&self, parsed: Self) -> Self {
        Self {
            publisher: parsed.publisher.or_else(|| self.publisher.clone()),
            extension_type: parsed.extension_type.or_else(|| self.extension_type.clone()),
            type_handler_version: parsed
                .type_handler_version
                .or_else(|| self.type_handler_version.clone()),
            auto_upgrade_minor_version: parsed
                .auto_upgrade_minor_version
                .or(self.auto_upgrade_minor_version),
            settings: parsed.settings.or_else(|| self.settings.clone()),
            protected_settings: self.protected_settings.clone(),
            ..parsed
        }
    }
}

pub struct VirtualMachineExtension {
    service: Arc<dyn ComputeService>,
    pub attributes: VirtualMachineExtensionAttributes,
}

impl fmt::Debug for VirtualMachineExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualMachineExtension")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl VirtualMachineExtension {
    pub fn new(service: Arc<dyn ComputeService>, attributes: VirtualMachineExtensionAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(ext: &types::VirtualMachineExtension) -> VirtualMachineExtensionAttributes {
        let props = ext.properties.as_ref();
        VirtualMachineExtensionAttributes {
            id: Some(ext.id.clone()),
            name: Some(ext.name.clone()),
            resource_group: resource_group_from_id(&ext.id),
            location: ext.location.clone(),
            vm_name: segment_after(&ext.id, "virtualMachines"),
            publisher: props.and_then(|p| p.publisher.clone()),
            extension_type: props.and_then(|p| p.extension_type.clone()),
            type_handler_version: props.and_then(|p| p.type_handler_version.clone()),
            auto_upgrade_minor_version: props.and_then(|p| p.auto_upgrade_minor_version),
            settings: props.and_then(|p| p.settings.clone()),
            protected_settings: None,
        }
    }

    fn extension_params(&self) -> AzureResult<VmExtensionParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("resource_group", &a.resource_group)
            .field("location", &a.location)
            .field("name", &a.name)
            .field("vm_name", &a.vm_name)
            .field("publisher", &a.publisher)
            .field("extension_type", &a.extension_type)
            .field("type_handler_version", &a.type_handler_version)
            .check()?;
        Ok(VmExtensionParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            vm_name: require(KIND, "vm_name", &a.vm_name)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            publisher: require(KIND, "publisher", &a.publisher)?.to_string(),
            extension_type: require(KIND, "extension_type", &a.extension_type)?.to_string(),
            type_handler_version: require(KIND, "type_handler_version", &a.type_handler_version)?
                .to_string(),
            auto_upgrade_minor_version: a.auto_upgrade_minor_version,
            settings: a.settings.clone(),
            protected_settings: a.protected_settings.clone(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.extension_params()?;
        let ext = self.service.create_or_update_vm_extension(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&ext));
        Ok(self)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let a = &self.attributes;
        let rg = require(KIND, "resource_group", &a.resource_group)?;
        let vm = require(KIND, "vm_name", &a.vm_name)?;
        let name = require(KIND, "name", &a.name)?;
        self.service.delete_vm_extension(rg, vm, name).await
    }
}

/// Extensions installed on one VM.
pub struct VirtualMachineExtensions {
    service: Arc<dyn ComputeService>,
    pub resource_group: Option<String>,
    pub vm_name: Option<String>,
    loaded: Vec<VirtualMachineExtension>,
}

impl VirtualMachineExtensions {
    pub fn new(service: Arc<dyn ComputeService>) -> Self {
        Self {
            service,
            resource_group: None,
            vm_name: None,
            loaded: Vec::new(),
        }
    }

    pub fn on_vm(mut self, resource_group: impl Into<String>, vm_name: impl Into<String>) -> Self {
        self.resource_group = Some(resource_group.into());
        self.vm_name = Some(vm_name.into());
        self
    }

    /// Reads the `resources` array of the VM payload.
    pub async fn all(&mut self) -> AzureResult<&[VirtualMachineExtension]> {
        Requires::new("VirtualMachineExtensions")
            .field("resource_group", &self.resource_group)
            .field("vm_name", &self.vm_name)
            .check()?;
        let rg = require("VirtualMachineExtensions", "resource_group", &self.resource_group)?;
        let vm_name = require("VirtualMachineExtensions", "vm_name", &self.vm_name)?;
        let vm = self.service.get_virtual_machine(rg, vm_name).await?;
        self.loaded = vm
            .resources
            .iter()
            .map(|e| VirtualMachineExtension::new(self.service.clone(), VirtualMachineExtension::parse(e)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(
        &self,
        resource_group: &str,
        vm_name: &str,
        name: &str,
    ) -> AzureResult<VirtualMachineExtension> {
        let ext = self.service.get_vm_extension(resource_group, vm_name, name).await?;
        Ok(VirtualMachineExtension::new(
            self.service.clone(),
            VirtualMachineExtension::parse(&ext),
        ))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&VirtualMachineExtension> {
        self.loaded
            .iter()
            .find(|e| e.attributes.name.as_deref() == Some(name))
    }

    pub async fn create(
        &self,
        attributes: VirtualMachineExtensionAttributes,
    ) -> AzureResult<VirtualMachineExtension> {
        let mut ext = VirtualMachineExtension::new(self.service.clone(), attributes);
        ext.save().await?;
        Ok(ext)
    }
}
