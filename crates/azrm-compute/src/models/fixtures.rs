use crate::types::VirtualMachine;

pub const VM_ID: &str =
    "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachines/vm1";

pub fn linux_vm_json() -> serde_json::Value {
    serde_json::json!({
        "id": VM_ID,
        "name": "vm1",
        "location": "westus",
        "properties": {
            "hardwareProfile": { "vmSize": "Standard_A1" },
            "storageProfile": {
                "imageReference": {
                    "publisher": "Canonical",
                    "offer": "UbuntuServer",
                    "sku": "16.04-LTS",
                    "version": "latest"
                },
                "osDisk": {
                    "name": "vm1_os_disk",
                    "vhd": { "uri": "https://storacct.blob.core.windows.net/vhds/vm1_os_disk.vhd" },
                    "caching": "ReadWrite",
                    "createOption": "FromImage"
                },
                "dataDisks": [{
                    "lun": 0,
                    "name": "data1",
                    "diskSizeGB": 100,
                    "vhd": { "uri": "https://storacct.blob.core.windows.net/vhds/vm1-data1.vhd" },
                    "caching": "None",
                    "createOption": "Empty"
                }]
            },
            "osProfile": {
                "computerName": "vm1",
                "adminUsername": "azureuser",
                "linuxConfiguration": { "disablePasswordAuthentication": true }
            },
            "networkProfile": {
                "networkInterfaces": [
                    { "id": "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Network/networkInterfaces/nic1" }
                ]
            }
        }
    })
}

pub fn linux_vm() -> VirtualMachine {
    serde_json::from_value(linux_vm_json()).unwrap()
}

pub fn windows_vm() -> VirtualMachine {
    let mut json = linux_vm_json();
    let props = &mut json["properties"];
    props["osProfile"] = serde_json::json!({
        "computerName": "vm1",
        "adminUsername": "azureuser",
        "windowsConfiguration": { "provisionVMAgent": true, "enableAutomaticUpdates": false }
    });
    props["availabilitySet"] = serde_json::json!({
        "id": "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Compute/availabilitySets/as1"
    });
    serde_json::from_value(json).unwrap()
}

/// Managed OS disk: no `osDisk.vhd`, no `imageReference`.
pub fn managed_disk_vm() -> VirtualMachine {
    let mut json = linux_vm_json();
    json["properties"]["storageProfile"] = serde_json::json!({
        "osDisk": {
            "name": "vm1_os_disk",
            "caching": "ReadWrite",
            "createOption": "FromImage"
        }
    });
    serde_json::from_value(json).unwrap()
}

/// Minimal payload: no storage profile, no availability set.
pub fn bare_vm() -> VirtualMachine {
    serde_json::from_value(serde_json::json!({
        "id": VM_ID,
        "name": "vm1",
        "location": "westus",
        "properties": {
            "hardwareProfile": { "vmSize": "Standard_A1" },
            "osProfile": { "adminUsername": "azureuser" },
            "networkProfile": { "networkInterfaces": [] }
        }
    }))
    .unwrap()
}
