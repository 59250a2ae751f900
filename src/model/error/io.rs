use macros::traceable;
use std::path::PathBuf;

traceable! {
    IOError {
        #[error("Failed to create directory: {path}")]
        CreateDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to read directory: {path}")]
        ReadDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to read file: {path}")]
        ReadFileFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to copy file: From {src} To {dst}")]
        CopyFileFailed { src: PathBuf, dst: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to move file: From {src} To {dst}")]
        MoveFileFailed { src: PathBuf, dst: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to delete directory: {path}")]
        DeleteDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to delete file: {path}")]
        DeleteFileFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to get file metadata: {path}")]
        GetMetadataFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to set file metadata: {path}")]
        SetMetadataFailed { path: PathBuf } => tracing::Level::ERROR,
    }
}
