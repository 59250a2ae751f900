//! Scheduled full and differential zip backups of directory trees, with
//! daily baselines, retention and point-in-time restore.

pub mod core;
pub mod interface;
pub mod model;
pub mod platform;
pub mod utils;
