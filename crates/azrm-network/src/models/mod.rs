pub mod load_balancer;
pub mod load_balancer_components;
pub mod local_network_gateway;
pub mod network_interface;
pub mod network_security_group;
pub mod network_security_rule;
pub mod public_ip;
pub mod subnet;
pub mod virtual_network;
