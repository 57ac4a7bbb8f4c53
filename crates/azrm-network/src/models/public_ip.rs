use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use azrm_core::ids::resource_group_from_id;
use azrm_core::{require, Attributes, AzureResult, Requires};

use crate::service::NetworkService;
use crate::types::{self, PublicIpParams};

const KIND: &str = "PublicIp";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicIpAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub ip_address: Option<String>,
    pub public_ip_allocation_method: Option<String>,
    pub idle_timeout_in_minutes: Option<u32>,
    pub domain_name_label: Option<String>,
    pub fqdn: Option<String>,
    pub reverse_fqdn: Option<String>,
}

impl Attributes for PublicIpAttributes {
    fn apply(&self, parsed: Self) -> Self {
        Self {
            domain_name_label: parsed
                .domain_name_label
                .or_else(|| self.domain_name_label.clone()),
            reverse_fqdn: parsed.reverse_fqdn.or_else(|| self.reverse_fqdn.clone()),
            ..parsed
        }
    }
}

pub struct PublicIp {
    service: Arc<dyn NetworkService>,
    pub attributes: PublicIpAttributes,
}

impl fmt::Debug for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicIp")
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl PublicIp {
    pub fn new(service: Arc<dyn NetworkService>, attributes: PublicIpAttributes) -> Self {
        Self { service, attributes }
    }

    pub fn parse(ip: &types::PublicIpAddress) -> PublicIpAttributes {
        let p = &ip.properties;
        let dns = p.dns_settings.as_ref();
        PublicIpAttributes {
            id: Some(ip.id.clone()),
            name: Some(ip.name.clone()),
            location: Some(ip.location.clone()),
            resource_group: resource_group_from_id(&ip.id),
            ip_address: p.ip_address.clone(),
            public_ip_allocation_method: p.public_ip_allocation_method.clone(),
            idle_timeout_in_minutes: p.idle_timeout_in_minutes,
            domain_name_label: dns.and_then(|d| d.domain_name_label.clone()),
            fqdn: dns.and_then(|d| d.fqdn.clone()),
            reverse_fqdn: dns.and_then(|d| d.reverse_fqdn.clone()),
        }
    }

    fn public_ip_params(&self) -> AzureResult<PublicIpParams> {
        let a = &self.attributes;
        Requires::new(KIND)
            .field("name", &a.name)
            .field("location", &a.location)
            .field("resource_group", &a.resource_group)
            .field("public_ip_allocation_method", &a.public_ip_allocation_method)
            .check()?;
        Ok(PublicIpParams {
            resource_group: require(KIND, "resource_group", &a.resource_group)?.to_string(),
            name: require(KIND, "name", &a.name)?.to_string(),
            location: require(KIND, "location", &a.location)?.to_string(),
            public_ip_allocation_method: require(KIND, "public_ip_allocation_method", &a.public_ip_allocation_method)?
                .to_string(),
            idle_timeout_in_minutes: a.idle_timeout_in_minutes,
            domain_name_label: a.domain_name_label.clone(),
        })
    }

    pub async fn save(&mut self) -> AzureResult<&Self> {
        let params = self.public_ip_params()?;
        let ip = self.service.create_or_update_public_ip(&params).await?;
        self.attributes = self.attributes.apply(Self::parse(&ip));
        Ok(self)
    }

    /// No address has been assigned yet (dynamic allocation before attach).
    pub fn is_empty(&self) -> bool {
        self.attributes
            .ip_address
            .as_deref()
            .map_or(true, str::is_empty)
    }

    pub async fn destroy(&self) -> AzureResult<bool> {
        let rg = require(KIND, "resource_group", &self.attributes.resource_group)?;
        let name = require(KIND, "name", &self.attributes.name)?;
        self.service.delete_public_ip(rg, name).await
    }
}

pub struct PublicIps {
    service: Arc<dyn NetworkService>,
    pub resource_group: Option<String>,
    loaded: Vec<PublicIp>,
}

impl PublicIps {
    pub fn new(service: Arc<dyn NetworkService>) -> Self {
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

    pub async fn all(&mut self) -> AzureResult<&[PublicIp]> {
        let rg = require("PublicIps", "resource_group", &self.resource_group)?;
        let ips = self.service.list_public_ips(rg).await?;
        self.loaded = ips
            .iter()
            .map(|ip| PublicIp::new(self.service.clone(), PublicIp::parse(ip)))
            .collect();
        Ok(&self.loaded)
    }

    pub async fn get(&self, resource_group: &str, name: &str) -> AzureResult<PublicIp> {
        let ip = self.service.get_public_ip(resource_group, name).await?;
        Ok(PublicIp::new(self.service.clone(), PublicIp::parse(&ip)))
    }

    pub fn find_loaded(&self, name: &str) -> Option<&PublicIp> {
        self.loaded
            .iter()
            .find(|ip| ip.attributes.name.as_deref() == Some(name))
    }

    pub fn loaded(&self) -> &[PublicIp] {
        &self.loaded
    }

    pub async fn create(&self, attributes: PublicIpAttributes) -> AzureResult<PublicIp> {
        let mut ip = PublicIp::new(self.service.clone(), attributes);
        ip.save().await?;
        Ok(ip)
    }

    pub async fn check_public_ip_exists(&self, resource_group: &str, name: &str) -> AzureResult<bool> {
        self.service.check_public_ip_exists(resource_group, name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockNetworkService;
    use crate::types::{PublicIpDnsSettings, PublicIpProperties};

    fn wire(ip_address: Option<&str>) -> types::PublicIpAddress {
        types::PublicIpAddress {
            id: "/subscriptions/s/resourceGroups/fog-rg/providers/Microsoft.Network/publicIPAddresses/fog-ip".into(),
            name: "fog-ip".into(),
            location: "westus".into(),
            properties: PublicIpProperties {
                public_ip_allocation_method: Some("Dynamic".into()),
                ip_address: ip_address.map(String::from),
                idle_timeout_in_minutes: Some(4),
                dns_settings: Some(PublicIpDnsSettings {
                    domain_name_label: Some("fogtest".into()),
                    fqdn: Some("fogtest.westus.cloudapp.azure.com".into()),
                    reverse_fqdn: None,
                }),
                ..Default::default()
            },
        }
    }

    #[test]
    fn parse_and_is_empty() {
        let a = PublicIp::parse(&wire(None));
        assert_eq!(a.fqdn.as_deref(), Some("fogtest.westus.cloudapp.azure.com"));
        assert_eq!(a.idle_timeout_in_minutes, Some(4));

        let service: Arc<dyn NetworkService> = Arc::new(MockNetworkService::new());
        assert!(PublicIp::new(service.clone(), a).is_empty());
        assert!(!PublicIp::new(service, PublicIp::parse(&wire(Some("40.1.2.3")))).is_empty());
    }

    #[tokio::test]
    async fn save_requires_allocation_method() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_public_ip().times(0);
        let mut ip = PublicIp::new(
            Arc::new(mock),
            PublicIpAttributes {
                name: Some("fog-ip".into()),
                location: Some("westus".into()),
                resource_group: Some("fog-rg".into()),
                ..Default::default()
            },
        );
        let err = ip.save().await.unwrap_err();
        assert!(err.message.ends_with("public_ip_allocation_method"));
    }

    #[tokio::test]
    async fn create_applies_response() {
        let mut mock = MockNetworkService::new();
        mock.expect_create_or_update_public_ip()
            .withf(|p: &PublicIpParams| {
                p.public_ip_allocation_method == "Dynamic" && p.domain_name_label.as_deref() == Some("fogtest")
            })
            .times(1)
            .returning(|_| Ok(wire(None)));
        let ips = PublicIps::new(Arc::new(mock));
        let ip = ips
            .create(PublicIpAttributes {
                name: Some("fog-ip".into()),
                location: Some("westus".into()),
                resource_group: Some("fog-rg".into()),
                public_ip_allocation_method: Some("Dynamic".into()),
                domain_name_label: Some("fogtest".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(ip.attributes.id.is_some());
        assert_eq!(ip.attributes.fqdn.as_deref(), Some("fogtest.westus.cloudapp.azure.com"));
    }

    #[tokio::test]
    async fn collection_all_get_destroy() {
        let mut mock = MockNetworkService::new();
        mock.expect_list_public_ips()
            .withf(|rg: &str| rg == "fog-rg")
            .returning(|_| Ok(vec![wire(None), wire(Some("40.1.2.3"))]));
        mock.expect_get_public_ip().returning(|_, _| Ok(wire(Some("40.1.2.3"))));
        mock.expect_delete_public_ip().times(1).returning(|_, _| Ok(true));
        mock.expect_check_public_ip_exists().returning(|_, _| Ok(false));
        let mut ips = PublicIps::new(Arc::new(mock)).in_resource_group("fog-rg");
        assert_eq!(ips.all().await.unwrap().len(), 2);
        let ip = ips.get("fog-rg", "fog-ip").await.unwrap();
        assert_eq!(ip.attributes.ip_address.as_deref(), Some("40.1.2.3"));
        assert!(ip.destroy().await.unwrap());
        assert!(!ips.check_public_ip_exists("fog-rg", "nope").await.unwrap());
    }
}
