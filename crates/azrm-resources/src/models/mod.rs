pub mod resource_group;
