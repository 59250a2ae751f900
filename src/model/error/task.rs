use macros::traceable;
use std::path::PathBuf;

traceable! {
    TaskError {
        #[no_source]
        #[error("Another operation is running on {root}")]
        RootBusy { root: PathBuf } => tracing::Level::WARN,

        #[no_source]
        #[error("Backup engine is shutting down")]
        ShuttingDown => tracing::Level::WARN,

        #[no_source]
        #[error("Subject not found: {name}")]
        SubjectNotFound { name: String } => tracing::Level::WARN,

        #[error("Worker thread panicked")]
        ThreadPanic => tracing::Level::ERROR,
    }
}
