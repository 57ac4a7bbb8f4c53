//! Azure Virtual Machines – create, get, list, lifecycle actions, data disks.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use serde_json::{json, Value};

use azrm_core::{AsyncOperation, AzureClient, AzureResult, SubResource};

use crate::types::{DataDisk, DataDiskParams, VirtualHardDisk, VirtualMachine, VmInstanceView, VmSize};

const PLATFORM_LINUX: &str = "linux";

fn vm_url(client: &AzureClient, resource_group: &str, vm_name: &str, suffix: &str) -> AzureResult<String> {
    let api = &client.config().api_version_compute;
    client.resource_group_url(
        resource_group,
        &format!(
            "/providers/Microsoft.Compute/virtualMachines/{}{}?api-version={}",
            vm_name, suffix, api
        ),
    )
}

pub fn is_linux(platform: Option<&str>) -> bool {
    platform
        .map(|p| p.trim().eq_ignore_ascii_case(PLATFORM_LINUX))
        .unwrap_or(false)
}

/// Blob URI for a disk stored in the `vhds` container of `storage_account`.
pub fn vhd_uri(storage_account: &str, disk_name: &str) -> String {
    format!(
        "https://{}.blob.core.windows.net/vhds/{}.vhd",
        storage_account, disk_name
    )
}

/// List VMs in a resource group.
pub async fn list_virtual_machines(
    client: &AzureClient,
    resource_group: &str,
) -> AzureResult<Vec<VirtualMachine>> {
    let api = &client.config().api_version_compute;
    let url = client.resource_group_url(
        resource_group,
        &format!("/providers/Microsoft.Compute/virtualMachines?api-version={}", api),
    )?;
    debug!("list_virtual_machines({}) → {}", resource_group, url);
    client.get_all_pages(&url).await
}

pub async fn get_virtual_machine(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
) -> AzureResult<VirtualMachine> {
    let url = vm_url(client, resource_group, vm_name, "")?;
    debug!("get_virtual_machine({}/{}) → {}", resource_group, vm_name, url);
    client.get_json(&url).await
}

pub async fn check_vm_exists(client: &AzureClient, resource_group: &str, vm_name: &str) -> AzureResult<bool> {
    let url = vm_url(client, resource_group, vm_name, "")?;
    debug!("check_vm_exists({}/{}) → {}", resource_group, vm_name, url);
    client.exists(&url).await
}

/// Request body for `PUT virtualMachines/{name}`.
pub fn virtual_machine_body(params: &crate::types::VirtualMachineParams) -> Value {
    let os_disk_name = format!("{}_os_disk", params.name);
    let mut os_disk = json!({
        "name": os_disk_name,
        "vhd": { "uri": vhd_uri(&params.storage_account_name, &os_disk_name) },
        "createOption": "FromImage",
        "caching": params.os_disk_caching.as_deref().unwrap_or("ReadWrite"),
    });

    let mut storage_profile = json!({});
    match &params.vhd_path {
        Some(image) => {
            os_disk["osType"] = json!(params.platform.as_deref().unwrap_or("Windows"));
            os_disk["image"] = json!({ "uri": image });
        }
        None => {
            storage_profile["imageReference"] = json!({
                "publisher": params.publisher,
                "offer": params.offer,
                "sku": params.sku,
                "version": params.version,
            });
        }
    }
    storage_profile["osDisk"] = os_disk;

    let mut os_profile = json!({
        "computerName": params.name,
        "adminUsername": params.username,
    });
    if let Some(password) = &params.password {
        os_profile["adminPassword"] = json!(password);
    }
    if let Some(data) = &params.custom_data {
        os_profile["customData"] = json!(STANDARD.encode(data.as_bytes()));
    }
    if is_linux(params.platform.as_deref()) {
        let mut linux = json!({
            "disablePasswordAuthentication": params.disable_password_authentication.unwrap_or(false),
        });
        if let (Some(path), Some(key)) = (&params.ssh_key_path, &params.ssh_key_data) {
            linux["ssh"] = json!({ "publicKeys": [{ "path": path, "keyData": key }] });
        }
        os_profile["linuxConfiguration"] = linux;
    } else {
        os_profile["windowsConfiguration"] = json!({
            "provisionVMAgent": params.provision_vm_agent.unwrap_or(true),
            "enableAutomaticUpdates": params.enable_automatic_updates.unwrap_or(true),
        });
    }

    let interfaces: Vec<Value> = params
        .network_interface_card_ids
        .iter()
        .enumerate()
        .map(|(i, id)| json!({ "id": id, "properties": { "primary": i == 0 } }))
        .collect();

    let mut properties = json!({
        "hardwareProfile": { "vmSize": params.vm_size },
        "storageProfile": storage_profile,
        "osProfile": os_profile,
        "networkProfile": { "networkInterfaces": interfaces },
    });
    if let Some(id) = &params.availability_set_id {
        properties["availabilitySet"] = json!(SubResource::new(id.clone()));
    }

    json!({ "location": params.location, "properties": properties })
}

pub async fn create_virtual_machine(
    client: &AzureClient,
    params: &crate::types::VirtualMachineParams,
) -> AzureResult<VirtualMachine> {
    let url = vm_url(client, &params.resource_group, &params.name, "")?;
    debug!("create_virtual_machine({}/{}) → {}", params.resource_group, params.name, url);
    client.put_json(&url, &virtual_machine_body(params)).await
}

/// Starts creation and returns the operation handle without waiting for provisioning.
pub async fn create_virtual_machine_async(
    client: &AzureClient,
    params: &crate::types::VirtualMachineParams,
) -> AzureResult<Option<AsyncOperation>> {
    let url = vm_url(client, &params.resource_group, &params.name, "")?;
    debug!("create_virtual_machine_async({}/{}) → {}", params.resource_group, params.name, url);
    let (_, operation): (Value, _) = client.put_json_async(&url, &virtual_machine_body(params)).await?;
    Ok(operation)
}

pub async fn delete_virtual_machine(client: &AzureClient, resource_group: &str, vm_name: &str) -> AzureResult<()> {
    let url = vm_url(client, resource_group, vm_name, "")?;
    debug!("delete_virtual_machine({}/{}) → {}", resource_group, vm_name, url);
    client.delete(&url).await
}

/// POST one of the lifecycle actions (`start`, `powerOff`, `restart`, ...).
pub async fn vm_action(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
    action: &str,
) -> AzureResult<()> {
    let url = vm_url(client, resource_group, vm_name, &format!("/{}", action))?;
    debug!("vm_action({}/{}, {}) → {}", resource_group, vm_name, action, url);
    client.post_action(&url).await
}

pub async fn list_available_sizes(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
) -> AzureResult<Vec<VmSize>> {
    let url = vm_url(client, resource_group, vm_name, "/vmSizes")?;
    debug!("list_available_sizes({}/{}) → {}", resource_group, vm_name, url);
    client.get_all_pages(&url).await
}

pub async fn get_instance_view(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
) -> AzureResult<VmInstanceView> {
    let url = vm_url(client, resource_group, vm_name, "/instanceView")?;
    debug!("get_instance_view({}/{}) → {}", resource_group, vm_name, url);
    client.get_json(&url).await
}

/// Smallest LUN not used by `disks`.
pub fn next_free_lun(disks: &[DataDisk]) -> u32 {
    (0..)
        .find(|lun| !disks.iter().any(|d| d.lun == *lun))
        .unwrap_or_default()
}

async fn patch_data_disks(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
    disks: &[DataDisk],
) -> AzureResult<VirtualMachine> {
    let url = vm_url(client, resource_group, vm_name, "")?;
    let body = json!({ "properties": { "storageProfile": { "dataDisks": disks } } });
    client.patch_json(&url, &body).await
}

fn current_data_disks(vm: &VirtualMachine) -> Vec<DataDisk> {
    vm.properties
        .storage_profile
        .as_ref()
        .and_then(|s| s.data_disks.clone())
        .unwrap_or_default()
}

pub async fn attach_data_disk_to_vm(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
    disk: &DataDiskParams,
) -> AzureResult<VirtualMachine> {
    let vm = get_virtual_machine(client, resource_group, vm_name).await?;
    let mut disks = current_data_disks(&vm);
    let lun = next_free_lun(&disks);
    debug!("attach_data_disk_to_vm({}/{}, {}) lun {}", resource_group, vm_name, disk.disk_name, lun);
    disks.push(DataDisk {
        lun,
        name: Some(disk.disk_name.clone()),
        disk_size_gb: Some(disk.disk_size_gb),
        vhd: Some(VirtualHardDisk {
            uri: vhd_uri(&disk.storage_account_name, &format!("{}-{}", vm_name, disk.disk_name)),
        }),
        caching: None,
        create_option: Some("Empty".into()),
    });
    patch_data_disks(client, resource_group, vm_name, &disks).await
}

pub async fn detach_data_disk_from_vm(
    client: &AzureClient,
    resource_group: &str,
    vm_name: &str,
    disk_name: &str,
) -> AzureResult<VirtualMachine> {
    let vm = get_virtual_machine(client, resource_group, vm_name).await?;
    let disks: Vec<DataDisk> = current_data_disks(&vm)
        .into_iter()
        .filter(|d| d.name.as_deref() != Some(disk_name))
        .collect();
    debug!("detach_data_disk_from_vm({}/{}, {})", resource_group, vm_name, disk_name);
    patch_data_disks(client, resource_group, vm_name, &disks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VirtualMachineParams;

    fn linux_params() -> VirtualMachineParams {
        VirtualMachineParams {
            resource_group: "rg".into(),
            name: "vm1".into(),
            location: "westus".into(),
            vm_size: "Standard_A1".into(),
            storage_account_name: "sa".into(),
            username: "azureuser".into(),
            disable_password_authentication: Some(true),
            ssh_key_path: Some("/home/azureuser/.ssh/authorized_keys".into()),
            ssh_key_data: Some("ssh-rsa AAA".into()),
            network_interface_card_ids: vec!["nic-a".into(), "nic-b".into()],
            publisher: Some("Canonical".into()),
            offer: Some("UbuntuServer".into()),
            sku: Some("16.04-LTS".into()),
            version: Some("latest".into()),
            platform: Some(" Linux ".into()),
            custom_data: Some("echo hi".into()),
            ..Default::default()
        }
    }

    #[test]
    fn linux_detection() {
        assert!(is_linux(Some(" LINUX")));
        assert!(!is_linux(Some("Windows")));
        assert!(!is_linux(None));
    }

    #[test]
    fn linux_body_shape() {
        let body = virtual_machine_body(&linux_params());
        let props = &body["properties"];
        assert_eq!(props["hardwareProfile"]["vmSize"], "Standard_A1");
        assert_eq!(props["storageProfile"]["imageReference"]["offer"], "UbuntuServer");
        assert_eq!(
            props["storageProfile"]["osDisk"]["vhd"]["uri"],
            "https://sa.blob.core.windows.net/vhds/vm1_os_disk.vhd"
        );
        let linux = &props["osProfile"]["linuxConfiguration"];
        assert_eq!(linux["disablePasswordAuthentication"], true);
        assert_eq!(linux["ssh"]["publicKeys"][0]["keyData"], "ssh-rsa AAA");
        assert_eq!(props["osProfile"]["customData"], STANDARD.encode("echo hi"));
        assert_eq!(props["networkProfile"]["networkInterfaces"][0]["properties"]["primary"], true);
        assert_eq!(props["networkProfile"]["networkInterfaces"][1]["properties"]["primary"], false);
        assert!(props.get("availabilitySet").is_none());
    }

    #[test]
    fn custom_image_body_skips_image_reference() {
        let params = VirtualMachineParams {
            vhd_path: Some("https://sa.blob.core.windows.net/images/base.vhd".into()),
            platform: Some("Windows".into()),
            password: Some("P@ss".into()),
            availability_set_id: Some("/as/id".into()),
            ..linux_params()
        };
        let body = virtual_machine_body(&params);
        let storage = &body["properties"]["storageProfile"];
        assert!(storage.get("imageReference").is_none());
        assert_eq!(storage["osDisk"]["osType"], "Windows");
        assert_eq!(storage["osDisk"]["image"]["uri"], "https://sa.blob.core.windows.net/images/base.vhd");
        assert_eq!(body["properties"]["osProfile"]["adminPassword"], "P@ss");
        assert!(body["properties"]["osProfile"].get("windowsConfiguration").is_some());
        assert_eq!(body["properties"]["availabilitySet"]["id"], "/as/id");
    }

    #[test]
    fn lun_allocation_fills_gaps() {
        let disk = |lun| DataDisk {
            lun,
            ..Default::default()
        };
        assert_eq!(next_free_lun(&[]), 0);
        assert_eq!(next_free_lun(&[disk(0), disk(2)]), 1);
        assert_eq!(next_free_lun(&[disk(0), disk(1)]), 2);
    }
}
