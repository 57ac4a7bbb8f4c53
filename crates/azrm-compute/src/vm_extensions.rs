//! Azure VM extensions – get, create or update, delete.

use log::debug;
use serde_json::json;

use azrm_core::{AzureClient, AzureResult};

use crate::types::{VirtualMachineExtension, VmExtensionParams};

fn extension_url(client: &AzureClient, resource_group: &str, vm_name: &str, name: &str) -> AzureResult<String> {
    let api = &client.config().api_version_compute;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Compute/virtualMachines/{}/extensions/{}?api-version={}",
            vm_name, name, api
        ),
    )
}

pub async fn get_vm_extension(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
    name: &str,
) -> AzureResult<VirtualMachineExtension> {
    let url = extension_url(client, resource_group, vm_name, name)?;
    debug!("get_vm_extension({}/{}/{}) → {}", resource_group, vm_name, name, url);
    client.get_json(&url).await
}

pub async fn create_or_update_vm_extension(
    client: &AzureClient,
    params: &VmExtensionParams,
) -> AzureResult<VirtualMachineExtension> {
    let url = extension_url(client, &params.resource_group, &params.vm_name, &params.name)?;
    debug!(
        "create_or_update_vm_extension({}/{}/{}) → {}",
        params.resource_group, params.vm_name, params.name, url
    );
    let mut properties = json!({
        "publisher": params.publisher,
        "type": params.extension_type,
        "typeHandlerVersion": params.type_handler_version,
    });
    if let Some(auto) = params.auto_upgrade_minor_version {
        properties["autoUpgradeMinorVersion"] = json!(auto);
    }
    if let Some(settings) = &params.settings {
        properties["settings"] = settings.clone();
    }
    if let Some(protected) = &params.protected_settings {
        properties["protectedSettings"] = protected.clone();
    }
    let body = json!({ "location": params.location, "properties": properties });
    client.put_json(&url, &body).await
}

pub async fn delete_vm_extension(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
    name: &str,
) -> AzureResult<()> {
    let url = extension_url(client, resource_group, vm_name, name)?;
    debug!("delete_vm_extension({}/{}/{}) → {}", resource_group, vm_name, name, url);
    client.delete(&url).await
}
