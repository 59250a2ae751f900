use macros::traceable;
use std::path::PathBuf;

traceable! {
    BackupError {
        #[no_source]
        #[error("Source directory not found: {path}")]
        SourceNotFound { path: PathBuf } => tracing::Level::ERROR,

        #[no_source]
        #[error("Archive already exists: {path}")]
        ArchiveAlreadyExists { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to write archive: {path}")]
        ArchiveWriteFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to extract archive: {path}")]
        ArchiveExtractFailed { path: PathBuf } => tracing::Level::ERROR,

        #[no_source]
        #[error("Invalid archive name: {name}")]
        InvalidArchiveName { name: String } => tracing::Level::WARN,

        #[no_source]
        #[error("Baseline not found: {path}")]
        BaselineNotFound { path: PathBuf } => tracing::Level::ERROR,

        #[no_source]
        #[error("Backup entry not found: {path}")]
        EntryNotFound { path: PathBuf } => tracing::Level::WARN,

        #[no_source]
        #[error("Destination already exists: {path}")]
        DestinationExists { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to flush data before backup: {subject}")]
        FlushFailed { subject: String } => tracing::Level::ERROR,
    }
}
