pub mod schedule_table;
pub mod timer;
