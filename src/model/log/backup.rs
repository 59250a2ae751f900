use macros::loggable;
use std::path::PathBuf;

loggable! {
    BackupLog {
        #[error("Starting backup of {subject}")]
        Started { subject: String } => tracing::Level::INFO,

        #[error("Baseline created: {path}")]
        BaselineCreated { path: PathBuf } => tracing::Level::INFO,

        #[error("Archive created: {path} ({files} files)")]
        ArchiveCreated { path: PathBuf, files: usize } => tracing::Level::INFO,

        #[error("No changes since baseline: {path}")]
        NoChanges { path: PathBuf } => tracing::Level::INFO,

        #[error("Skipped file during baseline copy: {path}")]
        BaselineFileSkipped { path: PathBuf } => tracing::Level::WARN,

        #[error("Backup of {subject} has been finished ({elapsed_ms}ms)")]
        Finished { subject: String, elapsed_ms: u128 } => tracing::Level::INFO,

        #[error("Exported backup to {path}")]
        Exported { path: PathBuf } => tracing::Level::INFO,
    }
}
