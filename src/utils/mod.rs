pub mod logging;
pub mod raii_guard;
