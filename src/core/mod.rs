pub mod app_config;
pub mod backup;
pub mod backup_engine;
pub mod io_manager;
pub mod job;
pub mod purge;
pub mod restore;
pub mod schedule;
pub mod system;
