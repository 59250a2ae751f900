pub mod retention_engine;
