pub mod backup;
pub mod purge;
pub mod system;
