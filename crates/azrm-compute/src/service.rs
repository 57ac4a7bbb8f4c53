//! Remote operations the compute models depend on.

use std::sync::Arc;

use async_trait::async_trait;

use azrm_core::{AsyncOperation, AzureClient, AzureResult, OperationStatus};

use crate::types::{
    AvailabilitySet, AvailabilitySetParams, DataDiskParams, VirtualMachine,
    VirtualMachineExtension, VirtualMachineParams, VmExtensionParams, VmSize,
};
use crate::{availability_sets, virtual_machines, vm_extensions};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComputeService: Send + Sync {
    // ── Virtual machines ─────────────────────────────────────────────
    async fn list_virtual_machines(&self, resource_group: &str) -> AzureResult<Vec<VirtualMachine>>;
    async fn get_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<VirtualMachine>;
    async fn check_vm_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn create_virtual_machine(&self, params: &VirtualMachineParams) -> AzureResult<VirtualMachine>;
    async fn create_virtual_machine_async(
        &self,
        params: &VirtualMachineParams,
    ) -> AzureResult<Option<AsyncOperation>>;
    async fn get_operation_status(&self, operation: &AsyncOperation) -> AzureResult<OperationStatus>;
    async fn delete_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn generalize_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn power_off_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn start_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn restart_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn deallocate_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn redeploy_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn list_available_sizes_for_virtual_machine(
        &self,
        resource_group: &str,
        name: &str,
    ) -> AzureResult<Vec<VmSize>>;
    async fn check_vm_status(&self, resource_group: &str, name: &str) -> AzureResult<String>;
    async fn attach_data_disk_to_vm(
        &self,
        resource_group: &str,
        vm_name: &str,
        disk: &DataDiskParams,
    ) -> AzureResult<VirtualMachine>;
    async fn detach_data_disk_from_vm(
        &self,
        resource_group: &str,
        vm_name: &str,
        disk_name: &str,
    ) -> AzureResult<VirtualMachine>;

    // ── Availability sets ────────────────────────────────────────────
    async fn list_availability_sets(&self, resource_group: &str) -> AzureResult<Vec<AvailabilitySet>>;
    async fn get_availability_set(&self, resource_group: &str, name: &str) -> AzureResult<AvailabilitySet>;
    async fn create_availability_set(&self, params: &AvailabilitySetParams) -> AzureResult<AvailabilitySet>;
    async fn delete_availability_set(&self, resource_group: &str, name: &str) -> AzureResult<bool>;
    async fn check_availability_set_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool>;

    // ── Extensions ───────────────────────────────────────────────────
    async fn get_vm_extension(
        &self,
        resource_group: &str,
        vm_name: &str,
        name: &str,
    ) -> AzureResult<VirtualMachineExtension>;
    async fn create_or_update_vm_extension(
        &self,
        params: &VmExtensionParams,
    ) -> AzureResult<VirtualMachineExtension>;
    async fn delete_vm_extension(&self, resource_group: &str, vm_name: &str, name: &str) -> AzureResult<bool>;
}

/// `ComputeService` backed by the ARM REST API.
pub struct ArmComputeService {
    client: Arc<AzureClient>,
}

impl ArmComputeService {
    pub fn new(client: Arc<AzureClient>) -> Self {
        Self { client }
    }

    async fn action(&self, resource_group: &str, name: &str, action: &str) -> AzureResult<bool> {
        virtual_machines::vm_action(&self.client, resource_group, name, action).await?;
        Ok(true)
    }
}

#[async_trait]
impl ComputeService for ArmComputeService {
    async fn list_virtual_machines(&self, resource_group: &str) -> AzureResult<Vec<VirtualMachine>> {
        virtual_machines::list_virtual_machines(&self.client, resource_group).await
    }

    async fn get_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<VirtualMachine> {
        virtual_machines::get_virtual_machine(&self.client, resource_group, name).await
    }

    async fn check_vm_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        virtual_machines::check_vm_exists(&self.client, resource_group, name).await
    }

    async fn create_virtual_machine(&self, params: &VirtualMachineParams) -> AzureResult<VirtualMachine> {
        virtual_machines::create_virtual_machine(&self.client, params).await
    }

    async fn create_virtual_machine_async(
        &self,
        params: &VirtualMachineParams,
    ) -> AzureResult<Option<AsyncOperation>> {
        virtual_machines::create_virtual_machine_async(&self.client, params).await
    }

    async fn get_operation_status(&self, operation: &AsyncOperation) -> AzureResult<OperationStatus> {
        self.client.operation_status(operation).await
    }

    async fn delete_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        virtual_machines::delete_virtual_machine(&self.client, resource_group, name).await?;
        Ok(true)
    }

    async fn generalize_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.action(resource_group, name, "generalize").await
    }

    async fn power_off_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.action(resource_group, name, "powerOff").await
    }

    async fn start_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.action(resource_group, name, "start").await
    }

    async fn restart_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.action(resource_group, name, "restart").await
    }

    async fn deallocate_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.action(resource_group, name, "deallocate").await
    }

    async fn redeploy_virtual_machine(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.action(resource_group, name, "redeploy").await
    }

    async fn list_available_sizes_for_virtual_machine(
        &self,
        resource_group: &str,
        name: &str,
    ) -> AzureResult<Vec<VmSize>> {
        virtual_machines::list_available_sizes(&self.client, resource_group, name).await
    }

    async fn check_vm_status(&self, resource_group: &str, name: &str) -> AzureResult<String> {
        let view = virtual_machines::get_instance_view(&self.client, resource_group, name).await?;
        Ok(view.power_state().unwrap_or("unknown").to_string())
    }

    async fn attach_data_disk_to_vm(
        &self,
        resource_group: &str,
        vm_name: &str,
        disk: &DataDiskParams,
    ) -> AzureResult<VirtualMachine> {
        virtual_machines::attach_data_disk_to_vm(&self.client, resource_group, vm_name, disk).await
    }

    async fn detach_data_disk_from_vm(
        &self,
        resource_group: &str,
        vm_name: &str,
        disk_name: &str,
    ) -> AzureResult<VirtualMachine> {
        virtual_machines::detach_data_disk_from_vm(&self.client, resource_group, vm_name, disk_name).await
    }

    async fn list_availability_sets(&self, resource_group: &str) -> AzureResult<Vec<AvailabilitySet>> {
        availability_sets::list_availability_sets(&self.client, resource_group).await
    }

    async fn get_availability_set(&self, resource_group: &str, name: &str) -> AzureResult<AvailabilitySet> {
        availability_sets::get_availability_set(&self.client, resource_group, name).await
    }

    async fn create_availability_set(&self, params: &AvailabilitySetParams) -> AzureResult<AvailabilitySet> {
        availability_sets::create_availability_set(&self.client, params).await
    }

    async fn delete_availability_set(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        availability_sets::delete_availability_set(&self.client, resource_group, name).await?;
        Ok(true)
    }

    async fn check_availability_set_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        availability_sets::check_availability_set_exists(&self.client, resource_group, name).await
    }

    async fn get_vm_extension(
        &self,
        resource_group: &str,
        vm_name: &str,
        name: &str,
    ) -> AzureResult<VirtualMachineExtension> {
        vm_extensions::get_vm_extension(&self.client, resource_group, vm_name, name).await
    }

    async fn create_or_update_vm_extension(
        &self,
        params: &VmExtensionParams,
    ) -> AzureResult<VirtualMachineExtension> {
        vm_extensions::create_or_update_vm_extension(&self.client, params).await
    }

    async fn delete_vm_extension(&self, resource_group: &str, vm_name: &str, name: &str) -> AzureResult<bool> {
        vm_extensions::delete_vm_extension(&self.client, resource_group, vm_name, name).await?;
        Ok(true)
    }
}
