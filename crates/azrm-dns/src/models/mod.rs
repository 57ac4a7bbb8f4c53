pub mod record_set;
pub mod zone;
