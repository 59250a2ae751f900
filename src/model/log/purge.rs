use macros::loggable;
use std::path::PathBuf;

loggable! {
    PurgeLog {
        #[error("Starting delete expired backups task: {root}")]
        Started { root: PathBuf } => tracing::Level::INFO,

        #[error("Deleted expired entry: {path}")]
        EntryDeleted { path: PathBuf } => tracing::Level::DEBUG,

        #[error("Failed to check entry, ignored: {path}")]
        EntrySkipped { path: PathBuf } => tracing::Level::ERROR,

        #[error("No expired files have been deleted ({elapsed_ms}ms)")]
        NothingExpired { elapsed_ms: u128 } => tracing::Level::INFO,

        #[error("Expired files ({count}) have been deleted ({elapsed_ms}ms)")]
        ExpiredDeleted { count: usize, elapsed_ms: u128 } => tracing::Level::INFO,
    }
}
