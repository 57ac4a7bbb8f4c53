//! # azrm-network
//!
//! Virtual networks and the resources wired into them.
//!
//! - **Virtual Networks** – create or update, DNS server / address prefix / subnet edits
//! - **Subnets** – create, attach or detach security groups and route tables
//! - **Public IPs** – create, get, list, delete
//! - **Network Interfaces** – create, attach or detach subnet, public IP, security group
//! - **Load Balancers** – frontend configs, pools, rules, probes, inbound NAT
//! - **Network Security Groups** – create with rules, add or remove rules
//! - **Local Network Gateways** – on-premises gateway definitions

pub mod types;
pub mod virtual_networks;
pub mod subnets;
pub mod public_ips;
pub mod network_interfaces;
pub mod load_balancers;
pub mod network_security_groups;
pub mod local_network_gateways;
pub mod service;
pub mod models;

pub use models::load_balancer::{LoadBalancer, LoadBalancerAttributes, LoadBalancers};
pub use models::load_balancer_components::{
    FrontendIpConfigurationAttributes, InboundNatPoolAttributes, InboundNatRuleAttributes,
    LoadBalancingRuleAttributes, ProbeAttributes,
};
pub use models::local_network_gateway::{
    LocalNetworkGateway, LocalNetworkGatewayAttributes, LocalNetworkGateways,
};
pub use models::network_interface::{NetworkInterface, NetworkInterfaceAttributes, NetworkInterfaces};
pub use models::network_security_group::{
    NetworkSecurityGroup, NetworkSecurityGroupAttributes, NetworkSecurityGroups,
};
pub use models::network_security_rule::NetworkSecurityRuleAttributes;
pub use models::public_ip::{PublicIp, PublicIpAttributes, PublicIps};
pub use models::subnet::{Subnet, SubnetAttributes, Subnets};
pub use models::virtual_network::{VirtualNetwork, VirtualNetworkAttributes, VirtualNetworks};
pub use service::{ArmNetworkService, NetworkService};
