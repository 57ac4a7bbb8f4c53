pub mod async_response;
pub mod availability_set;
pub mod data_disk;
pub mod server;
pub mod vm_extension;

#[cfg(test)]
pub(crate) mod fixtures;
