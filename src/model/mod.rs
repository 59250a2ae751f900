pub mod archive_parameters;
pub mod backup_execution;
pub mod backup_layout;
pub mod comparison_mode;
pub mod config;
pub mod error;
pub mod ignore_predicate;
pub mod log;
pub mod retention_policy;
