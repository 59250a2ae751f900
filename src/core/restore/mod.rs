pub mod exporter;
pub mod restore_merger;
