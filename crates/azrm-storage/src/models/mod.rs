pub mod directory;
pub mod file;
pub mod storage_account;
