//! Pure helpers that pull names out of ARM resource ids and blob URIs.

/// Segment following `token` (case-insensitive) in a `/`-separated resource id.
pub fn segment_after(id: &str, token: &str) -> Option<String> {
    let parts: Vec<&str> = id.split('/').collect();
    parts
        .windows(2)
        .find(|w| w[0].eq_ignore_ascii_case(token))
        .map(|w| w[1])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `/subscriptions/S/resourceGroups/RG/providers/...` → `RG`.
pub fn resource_group_from_id(id: &str) -> Option<String> {
    segment_after(id, "resourceGroups")
}

/// Last non-empty path segment of a resource id.
pub fn name_from_id(id: &str) -> Option<String> {
    id.split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}

/// `https://ACCOUNT.blob.core.windows.net/container/blob.vhd` → `ACCOUNT`.
///
/// Takes segment 2 of the `/` split (the host) and truncates it at the first `.`.
pub fn storage_account_from_uri(uri: &str) -> Option<String> {
    uri.split('/')
        .nth(2)
        .and_then(|host| host.split('.').next())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VM_ID: &str = "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Compute/virtualMachines/N";

    #[test]
    fn resource_group_extracted() {
        assert_eq!(resource_group_from_id(VM_ID).as_deref(), Some("RG"));
    }

    #[test]
    fn resource_group_case_insensitive_token() {
        let id = "/subscriptions/S/resourcegroups/fog-rg/providers/Microsoft.Network/publicIPAddresses/ip";
        assert_eq!(resource_group_from_id(id).as_deref(), Some("fog-rg"));
    }

    #[test]
    fn resource_group_absent() {
        assert_eq!(resource_group_from_id("/subscriptions/S"), None);
        assert_eq!(resource_group_from_id(""), None);
        assert_eq!(resource_group_from_id("/subscriptions/S/resourceGroups/"), None);
    }

    #[test]
    fn parent_segment() {
        let id = "/subscriptions/S/resourceGroups/RG/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/sub1";
        assert_eq!(segment_after(id, "virtualNetworks").as_deref(), Some("vnet1"));
        assert_eq!(name_from_id(id).as_deref(), Some("sub1"));
    }

    #[test]
    fn storage_account_extracted() {
        assert_eq!(
            storage_account_from_uri("https://ACCOUNT.blob.core.windows.net/c/b").as_deref(),
            Some("ACCOUNT")
        );
    }

    #[test]
    fn storage_account_malformed() {
        assert_eq!(storage_account_from_uri("not-a-uri"), None);
        assert_eq!(storage_account_from_uri("https://"), None);
    }

    #[test]
    fn name_from_trailing_slash() {
        assert_eq!(name_from_id("/a/b/c/").as_deref(), Some("c"));
        assert_eq!(name_from_id(""), None);
    }
}
